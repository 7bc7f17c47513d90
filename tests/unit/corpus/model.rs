use super::*;

#[test]
fn chapter_list_parses_bare_and_enveloped() {
    let bare = r#"[{"nomor":1,"nama":"الفاتحة","namaLatin":"Al-Fatihah","jumlahAyat":7}]"#;
    let wrapped = r#"{"code":200,"message":"ok","data":[{"nomor":1,"nama":"الفاتحة","namaLatin":"Al-Fatihah","jumlahAyat":7,"tempatTurun":"Mekah"}]}"#;

    for body in [bare, wrapped] {
        let env: Envelope<Vec<SuratDto>> = serde_json::from_str(body).unwrap();
        let list: Vec<Surah> = env.into_inner().into_iter().map(Surah::from).collect();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].number, 1);
        assert_eq!(list[0].name_latin, "Al-Fatihah");
        assert_eq!(list[0].verse_count, 7);
    }
}

#[test]
fn detail_maps_ayat_and_drops_blank_transliteration() {
    let body = r#"{"data":{"nomor":1,"ayat":[
        {"nomorAyat":1,"teksArab":"بِسْمِ","teksLatin":"bismi","teksIndonesia":"Dengan nama Allah"},
        {"nomorAyat":2,"teksArab":"اَلْحَمْدُ","teksLatin":"  ","teksIndonesia":"Segala puji"},
        {"nomorAyat":3,"teksArab":"الرَّحْمٰنِ","teksIndonesia":"Yang Maha Pengasih"}
    ]}}"#;
    let env: Envelope<SuratDetailDto> = serde_json::from_str(body).unwrap();
    let verses: Vec<Verse> = env.into_inner().ayat.into_iter().map(Verse::from).collect();

    assert_eq!(verses.len(), 3);
    assert_eq!(verses[0].transliteration.as_deref(), Some("bismi"));
    assert_eq!(verses[1].transliteration, None);
    assert_eq!(verses[2].transliteration, None);
    assert_eq!(verses[1].translation, "Segala puji");
}
