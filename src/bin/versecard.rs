use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use versecard::{
    AppConfig, BackgroundChoice, ExportFormat, ExportOutcome, FileStore, HttpVerseSource, Settings,
    Studio, Verse,
};

type App = Studio<HttpVerseSource, FileStore>;

#[derive(Parser, Debug)]
#[command(name = "versecard", version, about = "Compose Quran verses into styled images")]
struct Cli {
    /// Verse API base URL (overrides VERSECARD_API_BASE).
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// State directory (overrides VERSECARD_STATE_DIR).
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Font directory (overrides VERSECARD_FONTS_DIR).
    #[arg(long, global = true)]
    fonts_dir: Option<PathBuf>,

    /// Output directory for exports (overrides VERSECARD_OUT_DIR).
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all chapters.
    Chapters,
    /// Select a chapter and optionally a verse, then show it.
    Select {
        /// Chapter ordinal (1-114).
        chapter: u32,
        /// Verse ordinal; defaults to 1.
        verse: Option<u32>,
    },
    /// Show the selected verse.
    Verse,
    /// Export the selected verse with edited text (edits are not saved).
    Edit {
        /// Replacement Arabic text.
        #[arg(long)]
        arabic: Option<String>,
        /// Replacement translation.
        #[arg(long)]
        translation: Option<String>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = ExportFormat::Png)]
        format: ExportFormat,
    },
    /// Inspect or change settings.
    #[command(subcommand)]
    Settings(SettingsCmd),
    /// Choose the background.
    #[command(subcommand)]
    Background(BackgroundCmd),
    /// Manage presets.
    #[command(subcommand)]
    Preset(PresetCmd),
    /// Set or toggle the preview theme.
    Theme {
        /// New theme; toggles when omitted.
        #[arg(value_enum)]
        mode: Option<ThemeChoice>,
    },
    /// Render the preview (1x, with checkerboard for transparency) to a PNG.
    Preview {
        /// Output path; defaults to `preview.png` in the output directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Export the selected verse at 1080x1920.
    Export {
        /// Output format.
        #[arg(long, value_enum, default_value_t = ExportFormat::Png)]
        format: ExportFormat,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsCmd {
    /// Print the settings as JSON.
    Show,
    /// Set one field by camelCase path, e.g. `arabic.fontSize 40`.
    Set {
        /// Dotted field path.
        path: String,
        /// JSON value; bare words are taken as strings.
        value: String,
    },
    /// Restore defaults.
    Reset,
    /// Replace the settings with a JSON file.
    Import {
        /// Settings JSON file.
        file: PathBuf,
    },
    /// Write the settings to a JSON file.
    Export {
        /// Destination file.
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum BackgroundCmd {
    /// Solid color.
    Solid {
        /// Hex color such as `#0f172a`.
        color: String,
    },
    /// No background; exported PNGs keep alpha.
    Transparent,
    /// Cover-fitted photo.
    Photo {
        /// PNG or JPEG file.
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum PresetCmd {
    /// Save the current settings under a name.
    Save {
        /// Preset name.
        name: String,
    },
    /// List saved presets.
    List,
    /// Apply a preset by id or name.
    Apply {
        /// Preset id or name.
        preset: String,
    },
    /// Delete a preset by id or name.
    Delete {
        /// Preset id or name.
        preset: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeChoice {
    Light,
    Dark,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = resolve_config(&cli)?;
    let mut app = open_app(&cfg)?;

    match cli.cmd {
        Command::Chapters => cmd_chapters(&mut app),
        Command::Select { chapter, verse } => cmd_select(&mut app, chapter, verse),
        Command::Verse => cmd_verse(&mut app),
        Command::Edit {
            arabic,
            translation,
            format,
        } => cmd_edit(&mut app, &cfg, arabic, translation, format),
        Command::Settings(cmd) => cmd_settings(&mut app, cmd),
        Command::Background(cmd) => cmd_background(&mut app, cmd),
        Command::Preset(cmd) => cmd_preset(&mut app, cmd),
        Command::Theme { mode } => cmd_theme(&mut app, mode),
        Command::Preview { out } => cmd_preview(&mut app, &cfg, out),
        Command::Export { format } => cmd_export(&mut app, &cfg, format),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("versecard=info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn resolve_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut cfg = AppConfig::from_env()?;
    if let Some(base) = &cli.api_base {
        cfg.api_base = base.trim_end_matches('/').to_string();
    }
    if let Some(dir) = &cli.state_dir {
        cfg.state_dir = dir.clone();
        if cli.fonts_dir.is_none() && std::env::var_os(versecard::config::env::FONTS_DIR).is_none()
        {
            cfg.fonts_dir = dir.join("fonts");
        }
    }
    if let Some(dir) = &cli.fonts_dir {
        cfg.fonts_dir = dir.clone();
    }
    if let Some(dir) = &cli.out_dir {
        cfg.out_dir = dir.clone();
    }
    Ok(cfg)
}

fn open_app(cfg: &AppConfig) -> anyhow::Result<App> {
    let source = HttpVerseSource::new(cfg.api_base.clone(), cfg.http_timeout)?;
    let store = FileStore::open(&cfg.state_dir)
        .with_context(|| format!("open state dir '{}'", cfg.state_dir.display()))?;
    let mut app = Studio::open(source, store);
    let fonts = app.load_fonts_dir(&cfg.fonts_dir);
    tracing::debug!(fonts, dir = %cfg.fonts_dir.display(), "fonts loaded");
    Ok(app)
}

fn cmd_chapters(app: &mut App) -> anyhow::Result<()> {
    if app.refresh_chapters() == 0 {
        bail!("no chapters available (is the verse API reachable?)");
    }
    for c in app.session().chapters() {
        println!(
            "{:>3}  {:<24} {}  ({} ayat)",
            c.number, c.name_latin, c.name, c.verse_count
        );
    }
    Ok(())
}

fn cmd_select(app: &mut App, chapter: u32, verse: Option<u32>) -> anyhow::Result<()> {
    app.refresh_chapters();
    app.select_chapter(chapter)?;
    if let Some(v) = verse {
        app.select_verse(v)?;
    }
    print_current(app);
    Ok(())
}

fn cmd_verse(app: &mut App) -> anyhow::Result<()> {
    app.refresh_chapters();
    app.load_verse();
    print_current(app);
    Ok(())
}

fn print_current(app: &App) {
    let s = app.session();
    let label = s
        .current_chapter()
        .map(|c| format!("QS. {}", c.name_latin))
        .unwrap_or_else(|| format!("Surat {}", s.chapter()));
    println!("{label} : Ayat {}", s.verse());
    match s.current_verse() {
        Some(v) => print_verse(v),
        None => println!("(verse not available)"),
    }
}

fn print_verse(v: &Verse) {
    println!("{}", v.arabic);
    if let Some(latin) = &v.transliteration {
        println!("{latin}");
    }
    println!("{}", v.translation);
}

fn cmd_edit(
    app: &mut App,
    cfg: &AppConfig,
    arabic: Option<String>,
    translation: Option<String>,
    format: ExportFormat,
) -> anyhow::Result<()> {
    app.refresh_chapters();
    if app.load_verse().is_none() {
        bail!("the selected verse could not be loaded");
    }
    if let Some(text) = arabic {
        app.edit_arabic(text);
    }
    if let Some(text) = translation {
        app.edit_translation(text);
    }
    export_loaded(app, cfg, format)
}

fn cmd_settings(app: &mut App, cmd: SettingsCmd) -> anyhow::Result<()> {
    match cmd {
        SettingsCmd::Show => {
            println!("{}", serde_json::to_string_pretty(app.session().settings())?);
        }
        SettingsCmd::Set { path, value } => {
            let mut doc = serde_json::to_value(app.session().settings())?;
            set_json_path(&mut doc, &path, parse_value(&value))?;
            let next: Settings = serde_json::from_value(doc)
                .with_context(|| format!("invalid value for '{path}'"))?;
            app.replace_settings(next)?;
            println!("{path} = {value}");
        }
        SettingsCmd::Reset => {
            app.reset_settings()?;
            println!("settings reset to defaults");
        }
        SettingsCmd::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("read '{}'", file.display()))?;
            let next: Settings = serde_json::from_str(&raw)
                .with_context(|| format!("parse settings '{}'", file.display()))?;
            app.replace_settings(next)?;
            println!("settings imported from {}", file.display());
        }
        SettingsCmd::Export { file } => {
            let raw = serde_json::to_string_pretty(app.session().settings())?;
            std::fs::write(&file, raw).with_context(|| format!("write '{}'", file.display()))?;
            println!("settings written to {}", file.display());
        }
    }
    Ok(())
}

fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

fn set_json_path(
    doc: &mut serde_json::Value,
    path: &str,
    value: serde_json::Value,
) -> anyhow::Result<()> {
    let (parents, leaf) = match path.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, path),
    };
    let mut cur = doc;
    for part in parents.into_iter().flat_map(|p| p.split('.')) {
        cur = cur
            .get_mut(part)
            .with_context(|| format!("unknown settings field '{part}' in '{path}'"))?;
    }
    let obj = cur
        .as_object_mut()
        .with_context(|| format!("'{path}' does not name a settings field"))?;
    if !obj.contains_key(leaf) {
        bail!("unknown settings field '{leaf}' in '{path}'");
    }
    obj.insert(leaf.to_string(), value);
    Ok(())
}

fn cmd_background(app: &mut App, cmd: BackgroundCmd) -> anyhow::Result<()> {
    let choice = match cmd {
        BackgroundCmd::Solid { color } => {
            versecard::Rgba8::parse_hex(&color)?;
            BackgroundChoice::Solid(color)
        }
        BackgroundCmd::Transparent => BackgroundChoice::Transparent,
        BackgroundCmd::Photo { file } => {
            let bytes =
                std::fs::read(&file).with_context(|| format!("read '{}'", file.display()))?;
            let uri = versecard::to_data_uri(&bytes)?;
            versecard::decode_data_uri_image(&uri)?;
            BackgroundChoice::Photo(uri)
        }
    };
    app.set_background(choice)?;
    println!("background updated");
    Ok(())
}

fn cmd_preset(app: &mut App, cmd: PresetCmd) -> anyhow::Result<()> {
    match cmd {
        PresetCmd::Save { name } => match app.save_preset(&name)? {
            Some(p) => println!("saved preset '{}' ({})", p.name, p.id),
            None => bail!("preset name must not be blank"),
        },
        PresetCmd::List => {
            if app.presets().is_empty() {
                println!("no presets");
            }
            for p in app.presets() {
                println!("{}  {}", p.id, p.name);
            }
        }
        PresetCmd::Apply { preset } => {
            let id = preset_id(app, &preset)?;
            app.apply_preset(&id)?;
            println!("applied preset {id}");
        }
        PresetCmd::Delete { preset } => {
            let id = preset_id(app, &preset)?;
            app.delete_preset(&id)?;
            println!("deleted preset {id}");
        }
    }
    Ok(())
}

fn preset_id(app: &App, key: &str) -> anyhow::Result<String> {
    app.presets()
        .iter()
        .find(|p| p.id == key)
        .or_else(|| app.presets().iter().find(|p| p.name == key.trim()))
        .map(|p| p.id.clone())
        .with_context(|| format!("no preset with id or name '{key}'"))
}

fn cmd_theme(app: &mut App, mode: Option<ThemeChoice>) -> anyhow::Result<()> {
    let dark = match mode {
        Some(ThemeChoice::Dark) => {
            app.set_dark_mode(true)?;
            true
        }
        Some(ThemeChoice::Light) => {
            app.set_dark_mode(false)?;
            false
        }
        None => app.toggle_dark_mode()?,
    };
    println!("theme: {}", if dark { "dark" } else { "light" });
    Ok(())
}

fn cmd_preview(app: &mut App, cfg: &AppConfig, out: Option<PathBuf>) -> anyhow::Result<()> {
    app.refresh_chapters();
    app.load_verse();
    let frame = app.preview()?;
    let bytes = versecard::encode_png(&frame)?;
    let path = out.unwrap_or_else(|| cfg.out_dir.join("preview.png"));
    write_file(&path, &bytes)?;
    println!("wrote {}", path.display());
    Ok(())
}

fn cmd_export(app: &mut App, cfg: &AppConfig, format: ExportFormat) -> anyhow::Result<()> {
    app.refresh_chapters();
    app.load_verse();
    export_loaded(app, cfg, format)
}

fn export_loaded(app: &mut App, cfg: &AppConfig, format: ExportFormat) -> anyhow::Result<()> {
    match app.export(format)? {
        ExportOutcome::Exported(image) => {
            let path = image.write_to_dir(&cfg.out_dir)?;
            println!("wrote {} ({}x{})", path.display(), image.width, image.height);
        }
        ExportOutcome::Busy => println!("an export is already running"),
        ExportOutcome::NoSurface => println!("nothing to export"),
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}
