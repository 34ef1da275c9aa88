use chrono::NaiveDate;

use super::*;
use crate::admin::{BannerPatch, ClockPatch, ThemePatch, TilePatch};
use crate::platform::{FileStore, Launch, LogActivator, LogToaster, MemoryStore, NullAudio, Toast};
use crate::render::TextRenderer;
use crate::section::{Section, SectionId};
use crate::settings::{AppCategory, HourFormat, SETTINGS_KEY, Tile};

fn store_with(config: &Configuration) -> Box<dyn SettingsStore> {
    let mut store = MemoryStore::new();
    store.set(SETTINGS_KEY, &config.to_json().unwrap()).unwrap();
    Box::new(store)
}

/// Banner plus one 3x3 Entertainment grid labelled A..I.
fn grid_config() -> Configuration {
    let mut config = Configuration::default();
    config.apps.system_apps.clear();
    config.apps.music_apps.clear();
    config.apps.apps = ["A", "B", "C", "D", "E", "F", "G", "H", "I"]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            Tile::new(name.to_lowercase(), *name, "Tv")
                .with_url(format!("https://{}.example", name.to_lowercase()))
                .with_order(i as i64)
        })
        .collect();
    config
}

fn launcher(config: &Configuration) -> Launcher {
    Launcher::new(store_with(config), GridColumns::default())
}

fn press(launcher: &mut Launcher, keys: &[&str]) -> (LogActivator, LogToaster) {
    let mut activator = LogActivator::new();
    let mut toaster = LogToaster::new();
    for name in keys {
        let mut host = Host::new(&mut activator, &mut toaster);
        launcher.handle_key(&Key::from_name(name), &mut host);
    }
    (activator, toaster)
}

fn focused_id(launcher: &Launcher) -> Option<String> {
    match launcher.focused()? {
        FocusTarget::Tile { tile, .. } => Some(tile.id.clone()),
        FocusTarget::Banner(_) => Some("<banner>".to_string()),
    }
}

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 18)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

#[test]
fn walk_grid_and_activate() {
    let mut l = launcher(&grid_config());
    assert_eq!(focused_id(&l).as_deref(), Some("<banner>"));
    let (activator, toaster) = press(
        &mut l,
        &["ArrowDown", "ArrowRight", "ArrowRight", "ArrowDown", "Enter"],
    );
    let ent = l.view().index_of(SectionId::Entertainment).unwrap();
    assert_eq!(l.cursor(), Some(Cursor::new(ent, 5)));
    assert_eq!(focused_id(&l).as_deref(), Some("f"));
    assert_eq!(
        activator.last(),
        Some(&Launch::Url("https://f.example".into()))
    );
    assert_eq!(
        toaster.current().map(|t| t.title.as_str()),
        Some("Opening F")
    );
}

#[test]
fn right_wraps_around_row() {
    let mut config = grid_config();
    config.apps.apps.truncate(6);
    let mut l = launcher(&config);
    press(&mut l, &["ArrowDown"]);
    let start = l.cursor();
    press(&mut l, &["ArrowRight"; 6]);
    assert_eq!(l.cursor(), start);
}

#[test]
fn system_row_wraps_without_banner() {
    let mut config = Configuration::default();
    config.banner.enabled = false;
    config.apps.system_apps = ["a", "b", "c", "d", "e", "f"]
        .iter()
        .enumerate()
        .map(|(i, id)| Tile::new(*id, id.to_uppercase(), "Settings").with_order(i as i64))
        .collect();
    let mut l = launcher(&config);
    let system = l.view().index_of(SectionId::System).unwrap();
    assert_eq!(system, 0);
    assert_eq!(l.cursor(), Some(Cursor::new(system, 0)));
    assert_eq!(focused_id(&l).as_deref(), Some("a"));

    press(&mut l, &["ArrowRight"]);
    assert_eq!(focused_id(&l).as_deref(), Some("b"));
    press(&mut l, &["ArrowRight"; 5]);
    assert_eq!(l.cursor(), Some(Cursor::new(system, 0)));
    assert_eq!(focused_id(&l).as_deref(), Some("a"));
}

#[test]
fn short_row_down_crosses_or_stays() {
    // Entertainment: A..E in 3 columns; from C the slot below is empty.
    let mut config = grid_config();
    config.apps.apps.truncate(5);
    config.apps.music_apps = vec![Tile::new("m", "M", "Music").with_url("https://m.example")];
    let mut l = launcher(&config);
    press(&mut l, &["ArrowDown", "ArrowRight", "ArrowRight"]);
    assert_eq!(focused_id(&l).as_deref(), Some("c"));
    press(&mut l, &["ArrowDown"]);
    assert_eq!(focused_id(&l).as_deref(), Some("m"));

    config.apps.music_apps.clear();
    let mut l = launcher(&config);
    press(&mut l, &["ArrowDown", "ArrowRight", "ArrowRight", "ArrowDown"]);
    assert_eq!(focused_id(&l).as_deref(), Some("c"));
}

#[test]
fn admin_login_and_escape() {
    let mut l = launcher(&Configuration::default());
    let before = l.settings().clone();
    assert!(matches!(l.login("nope"), Err(TvboxError::IncorrectPassword)));
    assert!(!l.is_admin());

    l.login("admin123").unwrap();
    assert!(l.is_admin());
    let mut activator = LogActivator::new();
    let mut toaster = LogToaster::new();
    let mut host = Host::new(&mut activator, &mut toaster);
    assert!(l.handle_key(&Key::Escape, &mut host));
    assert!(!l.is_admin());
    assert_eq!(l.settings(), &before);
    assert_eq!(l.revision(), 0);
}

#[test]
fn escape_outside_admin_passes_through() {
    let mut l = launcher(&Configuration::default());
    let mut activator = LogActivator::new();
    let mut toaster = LogToaster::new();
    let mut host = Host::new(&mut activator, &mut toaster);
    assert!(!l.handle_key(&Key::Escape, &mut host));
    assert!(!l.handle_key(&Key::from_name("Tab"), &mut host));
    assert!(l.handle_key(&Key::ArrowUp, &mut host));
}

#[test]
fn added_tile_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut l = Launcher::new(
        Box::new(FileStore::open(dir.path()).unwrap()),
        GridColumns::default(),
    );
    l.login("admin123").unwrap();
    l.admin(|panel, _| {
        panel.add_app(
            AppCategory::Entertainment,
            Tile::new("x", "X", "Tv").with_order(99),
        )
    })
    .unwrap();
    assert_eq!(l.revision(), 1);

    let reloaded = Launcher::new(
        Box::new(FileStore::open(dir.path()).unwrap()),
        GridColumns::default(),
    );
    let ent = reloaded.view().index_of(SectionId::Entertainment).unwrap();
    let grid = reloaded.view().get(ent).and_then(Section::as_grid).unwrap();
    assert_eq!(grid.tiles.last().map(|t| t.id.as_str()), Some("x"));
    assert!(reloaded.settings().apps.apps.iter().any(|t| t.id == "x"));
}

#[test]
fn admin_edits_need_login() {
    let mut l = launcher(&Configuration::default());
    let result = l.admin(|panel, _| panel.change_password("secret"));
    assert!(matches!(result, Err(TvboxError::AdminRequired)));
    assert_eq!(l.revision(), 0);
}

#[test]
fn changed_password_applies_to_next_login() {
    let mut l = launcher(&Configuration::default());
    l.login("admin123").unwrap();
    l.admin(|panel, _| panel.change_password("s3cret")).unwrap();
    l.logout();
    assert!(l.login("admin123").is_err());
    l.login("s3cret").unwrap();
}

#[test]
fn clock_formats_follow_settings() {
    let mut l = launcher(&Configuration::default());
    l.login("admin123").unwrap();

    l.admin(|panel, _| {
        panel.update_clock(&ClockPatch {
            format: Some(HourFormat::H24),
            show_seconds: Some(true),
            show_date: Some(false),
            ..ClockPatch::default()
        })
    })
    .unwrap();
    assert!(l.tick(&at(9, 5, 7)));
    assert_eq!(l.clock_face().unwrap().time, "09:05:07");

    l.admin(|panel, _| {
        panel.update_clock(&ClockPatch {
            show_seconds: Some(false),
            ..ClockPatch::default()
        })
    })
    .unwrap();
    l.tick(&at(9, 5, 7));
    assert_eq!(l.clock_face().unwrap().time, "09:05");

    l.admin(|panel, _| {
        panel.update_clock(&ClockPatch {
            format: Some(HourFormat::H12),
            ..ClockPatch::default()
        })
    })
    .unwrap();
    l.tick(&at(9, 5, 7));
    assert_eq!(l.clock_face().unwrap().time, "09:05 AM");

    l.admin(|panel, _| {
        panel.update_clock(&ClockPatch {
            enabled: Some(false),
            ..ClockPatch::default()
        })
    })
    .unwrap();
    assert!(l.tick(&at(9, 5, 8)));
    assert!(l.clock_face().is_none());
}

#[test]
fn removing_focused_tile_clamps() {
    let mut l = launcher(&grid_config());
    press(&mut l, &["ArrowDown", "ArrowLeft"]);
    assert_eq!(focused_id(&l).as_deref(), Some("i"));
    l.login("admin123").unwrap();
    l.admin(|panel, _| panel.remove_app(AppCategory::Entertainment, "i"))
        .unwrap();
    assert_eq!(focused_id(&l).as_deref(), Some("h"));
}

#[test]
fn reorder_keeps_focus_on_same_tile() {
    let mut l = launcher(&grid_config());
    press(&mut l, &["ArrowDown", "ArrowRight"]);
    assert_eq!(focused_id(&l).as_deref(), Some("b"));
    l.login("admin123").unwrap();
    l.admin(|panel, _| panel.move_app(AppCategory::Entertainment, "b", 8))
        .unwrap();
    assert_eq!(focused_id(&l).as_deref(), Some("b"));
    let ent = l.view().index_of(SectionId::Entertainment).unwrap();
    assert_eq!(l.cursor(), Some(Cursor::new(ent, 8)));
}

#[test]
fn disabling_last_tile_of_grid_hops() {
    let mut config = grid_config();
    config.apps.apps.truncate(1);
    config.apps.music_apps = vec![Tile::new("m", "M", "Music").with_url("https://m.example")];
    let mut l = launcher(&config);
    press(&mut l, &["ArrowDown"]);
    assert_eq!(focused_id(&l).as_deref(), Some("a"));
    l.login("admin123").unwrap();
    l.admin(|panel, _| {
        panel.update_app(AppCategory::Entertainment, "a", &TilePatch::enabled(false))
    })
    .unwrap();
    assert_eq!(focused_id(&l).as_deref(), Some("m"));
}

#[test]
fn disabling_focused_banner_moves_to_grid() {
    let mut l = launcher(&grid_config());
    assert_eq!(focused_id(&l).as_deref(), Some("<banner>"));
    assert!(l.style().get(theme::BANNER_BG).is_some());
    l.login("admin123").unwrap();
    l.admin(|panel, _| {
        panel.update_banner(&BannerPatch {
            enabled: Some(false),
            ..BannerPatch::default()
        })
    })
    .unwrap();
    assert_eq!(focused_id(&l).as_deref(), Some("a"));
    assert!(l.style().get(theme::BANNER_BG).is_none());
}

#[test]
fn theme_change_is_republished() {
    let mut l = launcher(&Configuration::default());
    assert_eq!(l.style().get(theme::PRIMARY), Some("#3b82f6"));
    l.login("admin123").unwrap();
    l.admin(|panel, _| panel.update_theme(&ThemePatch::color("primary", "#ff0000").unwrap()))
        .unwrap();
    assert_eq!(l.style().get(theme::PRIMARY), Some("#ff0000"));
}

#[test]
fn column_change_preserves_focused_tile() {
    let mut l = launcher(&grid_config());
    press(&mut l, &["ArrowDown", "ArrowDown", "ArrowRight"]);
    assert_eq!(focused_id(&l).as_deref(), Some("e"));
    l.set_columns(GridColumns {
        system: 6,
        entertainment: 4,
        music: 3,
    });
    assert_eq!(focused_id(&l).as_deref(), Some("e"));
    // 4 columns: E is at index 4 (row 1, col 0); Up goes to A.
    press(&mut l, &["ArrowUp"]);
    assert_eq!(focused_id(&l).as_deref(), Some("a"));
}

#[test]
fn click_focuses_and_activates() {
    let mut l = launcher(&Configuration::default());
    let mut activator = LogActivator::new();
    let mut toaster = LogToaster::new();
    let system = l.view().index_of(SectionId::System).unwrap();
    {
        let mut host = Host::new(&mut activator, &mut toaster);
        assert!(l.click(system, 0, &mut host));
    }
    assert_eq!(
        activator.last(),
        Some(&Launch::Intent(
            "intent://#Intent;action=android.settings.WIFI_SETTINGS;end".into()
        ))
    );
    assert_eq!(l.cursor(), Some(Cursor::new(system, 0)));

    let mut host = Host::new(&mut activator, &mut toaster);
    assert!(!l.click(system, 99, &mut host));
    assert!(l.click(0, 0, &mut host));
    assert_eq!(
        toaster.current(),
        Some(&Toast::new("Opening RedPlay", "Your premium streaming service"))
    );
}

#[test]
fn inert_tile_activation_is_silent() {
    let mut config = grid_config();
    config.apps.apps[0].url = None;
    let mut l = launcher(&config);
    let (activator, toaster) = press(&mut l, &["ArrowDown", "Enter"]);
    assert!(activator.launched.is_empty());
    assert!(toaster.current().is_none());
}

#[test]
fn local_track_preview() {
    let mut l = launcher(&Configuration::default());
    let mut sink = NullAudio::default();
    assert!(matches!(
        l.preview("music-1", &mut sink),
        Err(TvboxError::AdminRequired)
    ));

    l.login("admin123").unwrap();
    l.admin(|panel, handles| panel.import_track("music-1", "Song.mp3", 42.0, handles))
        .unwrap();
    assert_eq!(l.settings().apps.local_music[0].title, "Song");

    assert!(l.preview("music-1", &mut sink).unwrap());
    l.preview_progress(12.0);
    assert_eq!(l.previewer().position_secs(), 12.0);
    assert!(!l.preview("music-1", &mut sink).unwrap());

    l.preview("music-1", &mut sink).unwrap();
    l.remove_track("music-1", &mut sink).unwrap();
    assert_eq!(l.previewer().playing(), None);
    assert!(l.settings().apps.local_music.is_empty());
}

#[test]
fn stale_track_handle_is_reported() {
    // A track persisted by an earlier run: its handle is not live here.
    let mut config = Configuration::default();
    config.apps.local_music.push(crate::settings::LocalTrack {
        id: "old".into(),
        title: "Old".into(),
        artist: String::new(),
        album: String::new(),
        duration_secs: 1.0,
        url: "blob:tvbox/1".into(),
        enabled: true,
        order: 0,
    });
    let mut l = launcher(&config);
    l.login("admin123").unwrap();
    let mut sink = NullAudio::default();
    assert!(matches!(
        l.preview("old", &mut sink),
        Err(TvboxError::MediaUnavailable(_))
    ));
    assert!(sink.playing.is_none());
}

#[test]
fn new_import_never_reuses_saved_handle() {
    let mut config = Configuration::default();
    config.apps.local_music.push(crate::settings::LocalTrack {
        id: "old".into(),
        title: "Old".into(),
        artist: String::new(),
        album: String::new(),
        duration_secs: 1.0,
        url: "blob:tvbox/1".into(),
        enabled: true,
        order: 0,
    });
    let mut l = launcher(&config);
    l.login("admin123").unwrap();
    l.admin(|panel, handles| panel.import_track("new", "New.mp3", 10.0, handles))
        .unwrap();
    let new_url = l.settings().apps.local_music[1].url.clone();
    assert_ne!(new_url, "blob:tvbox/1");

    let mut sink = NullAudio::default();
    assert!(matches!(
        l.preview("old", &mut sink),
        Err(TvboxError::MediaUnavailable(_))
    ));

    // Dropping the old entry must not release the new track's media.
    l.remove_track("old", &mut sink).unwrap();
    assert!(l.preview("new", &mut sink).unwrap());
    assert_eq!(sink.playing.as_deref(), Some(new_url.as_str()));
}

#[test]
fn text_frame() {
    let mut l = launcher(&grid_config());
    l.tick(&at(14, 30, 0));
    let mut text = TextRenderer::new();
    l.render(&mut text).unwrap();
    let frame = text.take_frame();
    assert!(frame.lines().next().unwrap().trim_start().starts_with("14:30"));
    assert!(frame.contains(">> RedPlay | CHEGOU A HORA"));
    assert!(frame.contains("== Apps =="));
    assert!(frame.contains("== System ==\n   (empty)"));
}
