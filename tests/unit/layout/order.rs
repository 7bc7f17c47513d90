use super::*;
use BlockId::*;

const ALL: Visibility = Visibility {
    translation: true,
    footer: true,
    divider: true,
};

#[test]
fn start_and_center_put_footer_last_with_divider_above() {
    for anchor in [VerticalAnchor::Start, VerticalAnchor::Center] {
        assert_eq!(
            block_order(anchor, ALL),
            vec![Arabic, Translation, Divider, Footer]
        );
    }
}

#[test]
fn end_moves_footer_first_and_divider_below_it() {
    assert_eq!(
        block_order(VerticalAnchor::End, ALL),
        vec![Footer, Divider, Arabic, Translation]
    );
}

#[test]
fn hidden_blocks_are_dropped() {
    let vis = Visibility {
        translation: false,
        footer: true,
        divider: false,
    };
    assert_eq!(block_order(VerticalAnchor::Center, vis), vec![Arabic, Footer]);
    assert_eq!(block_order(VerticalAnchor::End, vis), vec![Footer, Arabic]);
}

#[test]
fn divider_needs_footer() {
    let vis = Visibility {
        translation: true,
        footer: false,
        divider: true,
    };
    assert_eq!(
        block_order(VerticalAnchor::Start, vis),
        vec![Arabic, Translation]
    );
}

#[test]
fn every_flag_combination_keeps_arabic_exactly_once() {
    for anchor in [VerticalAnchor::Start, VerticalAnchor::Center, VerticalAnchor::End] {
        for bits in 0..8u8 {
            let vis = Visibility {
                translation: bits & 1 != 0,
                footer: bits & 2 != 0,
                divider: bits & 4 != 0,
            };
            let order = block_order(anchor, vis);
            assert_eq!(order.iter().filter(|b| **b == Arabic).count(), 1);
            assert_eq!(order.contains(&Translation), vis.translation);
            assert_eq!(order.contains(&Footer), vis.footer);
            assert_eq!(order.contains(&Divider), vis.footer && vis.divider);
        }
    }
}

#[test]
fn spacing_rules() {
    assert_eq!(spacing_between(Arabic, Translation, 40.0), 40.0);
    assert_eq!(spacing_between(Translation, Divider, 40.0), FOOTER_MARGIN);
    assert_eq!(spacing_between(Divider, Footer, 40.0), RULE_PADDING);
    assert_eq!(spacing_between(Footer, Divider, 40.0), RULE_PADDING);
    assert_eq!(spacing_between(Divider, Arabic, 40.0), FOOTER_MARGIN);
    assert_eq!(spacing_between(Footer, Arabic, 40.0), FOOTER_MARGIN);
}
