//! Admin console: `:`-prefixed command lines typed on stdin.
//!
//! Editing commands go through the launcher's admin panel, so they fail
//! with "admin mode required" until `login` succeeds.

use std::collections::HashMap;

use tvbox_core::admin::{BannerPatch, ClockPatch, ThemePatch, TilePatch};
use tvbox_core::error::{Result, TvboxError};
use tvbox_core::icons::FALLBACK_GLYPH;
use tvbox_core::launcher::Launcher;
use tvbox_core::music;
use tvbox_core::platform::AudioSink;
use tvbox_core::settings::{AppCategory, Corner, HourFormat, MusicCategory, Tile};

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Text(String),
    None,
    /// Leave the main loop.
    Quit,
}

/// State every command runs against.
pub struct Environment<'a> {
    pub launcher: &'a mut Launcher,
    pub audio: &'a mut dyn AudioSink,
    /// Wall time in milliseconds, used for generated ids.
    pub now_millis: i64,
}

/// A single console command.
pub trait Command {
    /// What the user types.
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    fn usage(&self) -> &str;

    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput>;
}

pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a command. Replaces any existing command with the same name.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    /// Parse and run one line. `help` is answered by the registry itself.
    pub fn execute(&self, line: &str, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let tokens = tokenize(line)?;
        let Some((name, rest)) = tokens.split_first() else {
            return Ok(CommandOutput::None);
        };
        let name = name.to_ascii_lowercase();
        if name == "help" {
            return Ok(CommandOutput::Text(self.help()));
        }
        let cmd = self
            .commands
            .get(&name)
            .ok_or_else(|| TvboxError::Command(format!("unknown command: {name}")))?;
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        log::debug!("console: {name} {args:?}");
        cmd.execute(&args, env)
    }

    fn help(&self) -> String {
        let mut cmds: Vec<&dyn Command> = self.commands.values().map(|c| c.as_ref()).collect();
        cmds.sort_by_key(|c| c.name());
        let mut out = String::from("Commands:");
        for cmd in cmds {
            out.push_str(&format!("\n  {:<44} {}", cmd.usage(), cmd.description()));
        }
        out
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry with every console command.
pub fn registry() -> CommandRegistry {
    let mut reg = CommandRegistry::new();
    reg.register(Box::new(LoginCmd));
    reg.register(Box::new(LogoutCmd));
    reg.register(Box::new(ListCmd));
    reg.register(Box::new(AddCmd));
    reg.register(Box::new(NewCmd));
    reg.register(Box::new(RemoveCmd));
    reg.register(Box::new(ToggleCmd { enable: true }));
    reg.register(Box::new(ToggleCmd { enable: false }));
    reg.register(Box::new(EditCmd));
    reg.register(Box::new(MoveCmd));
    reg.register(Box::new(BannerCmd));
    reg.register(Box::new(ThemeCmd));
    reg.register(Box::new(ClockCmd));
    reg.register(Box::new(PasswordCmd));
    reg.register(Box::new(MusicCmd));
    reg.register(Box::new(QuitCmd));
    reg
}

/// Split on whitespace, keeping `"double quoted"` runs together.
fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;
    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            },
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            },
            c => {
                current.push(c);
                in_token = true;
            },
        }
    }
    if quoted {
        return Err(TvboxError::Command("unterminated quote".to_string()));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn usage_error(cmd: &dyn Command) -> TvboxError {
    TvboxError::Command(format!("usage: {}", cmd.usage()))
}

/// `system`, `entertainment` (or `apps`), `music`.
fn parse_category(name: &str) -> Result<AppCategory> {
    if name.eq_ignore_ascii_case("apps") {
        return Ok(AppCategory::Entertainment);
    }
    AppCategory::from_name(name)
        .ok_or_else(|| TvboxError::Command(format!("unknown category: {name}")))
}

fn parse_switch(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(TvboxError::Command(format!("expected on/off, got {value}"))),
    }
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| TvboxError::Command(format!("not a number: {value}")))
}

/// Warning appended when a tile names an icon the launcher cannot draw.
fn icon_note(launcher: &Launcher, icon: &str) -> String {
    if launcher.icons().contains(icon) {
        String::new()
    } else {
        format!(" (no icon named {icon}; shown as {FALLBACK_GLYPH})")
    }
}

fn done(text: impl Into<String>) -> Result<CommandOutput> {
    Ok(CommandOutput::Text(text.into()))
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

struct LoginCmd;
impl Command for LoginCmd {
    fn name(&self) -> &str {
        "login"
    }
    fn description(&self) -> &str {
        "Enter admin mode"
    }
    fn usage(&self) -> &str {
        "login <password>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let [password] = args else {
            return Err(usage_error(self));
        };
        env.launcher.login(password)?;
        done("Admin mode on (Escape or `logout` to leave)")
    }
}

struct LogoutCmd;
impl Command for LogoutCmd {
    fn name(&self) -> &str {
        "logout"
    }
    fn description(&self) -> &str {
        "Leave admin mode"
    }
    fn usage(&self) -> &str {
        "logout"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        env.launcher.logout();
        done("Admin mode off")
    }
}

struct QuitCmd;
impl Command for QuitCmd {
    fn name(&self) -> &str {
        "quit"
    }
    fn description(&self) -> &str {
        "Exit the launcher"
    }
    fn usage(&self) -> &str {
        "quit"
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Quit)
    }
}

// ---------------------------------------------------------------------------
// Apps
// ---------------------------------------------------------------------------

struct ListCmd;
impl Command for ListCmd {
    fn name(&self) -> &str {
        "list"
    }
    fn description(&self) -> &str {
        "List tiles, including disabled ones"
    }
    fn usage(&self) -> &str {
        "list [category]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let categories = match args {
            [] => AppCategory::ALL.to_vec(),
            [name] => vec![parse_category(name)?],
            _ => return Err(usage_error(self)),
        };
        let apps = &env.launcher.settings().apps;
        let mut lines = Vec::new();
        for category in categories {
            lines.push(format!("[{}]", category.name()));
            let mut tiles: Vec<&Tile> = apps.tiles(category).iter().collect();
            tiles.sort_by_key(|t| t.order);
            for tile in tiles {
                let target = tile
                    .package_name
                    .as_deref()
                    .or(tile.url.as_deref())
                    .unwrap_or("-");
                let state = if tile.enabled { "" } else { " (disabled)" };
                lines.push(format!(
                    "  {:>3} {:<20} {:<16} {target}{state}",
                    tile.order, tile.id, tile.label
                ));
            }
        }
        done(lines.join("\n"))
    }
}

struct AddCmd;
impl Command for AddCmd {
    fn name(&self) -> &str {
        "add"
    }
    fn description(&self) -> &str {
        "Add a tile (target is a URL or a package name)"
    }
    fn usage(&self) -> &str {
        "add <category> <id> <label> <target> [icon]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (category, id, label, target, icon) = match args {
            [c, id, label, target] => (c, id, label, target, "Globe"),
            [c, id, label, target, icon] => (c, id, label, target, *icon),
            _ => return Err(usage_error(self)),
        };
        let category = parse_category(category)?;
        let order = env.launcher.settings().apps.tiles(category).len() as i64;
        let mut tile = Tile::new(*id, *label, icon).with_order(order);
        tile = if target.contains("://") {
            tile.with_url(*target)
        } else {
            tile.with_package(*target)
        };
        env.launcher
            .admin(|panel, _| panel.add_app(category, tile))?;
        done(format!(
            "Added {id} to {}{}",
            category.name(),
            icon_note(env.launcher, icon)
        ))
    }
}

struct NewCmd;
impl Command for NewCmd {
    fn name(&self) -> &str {
        "new"
    }
    fn description(&self) -> &str {
        "Add a placeholder tile to edit later"
    }
    fn usage(&self) -> &str {
        "new <category>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let [category] = args else {
            return Err(usage_error(self));
        };
        let category = parse_category(category)?;
        let now = env.now_millis;
        env.launcher
            .admin(|panel, _| panel.new_app(category, now))?;
        let id = env
            .launcher
            .settings()
            .apps
            .tiles(category)
            .last()
            .map(|t| t.id.clone())
            .unwrap_or_default();
        done(format!("Added {id}"))
    }
}

struct RemoveCmd;
impl Command for RemoveCmd {
    fn name(&self) -> &str {
        "remove"
    }
    fn description(&self) -> &str {
        "Remove a tile"
    }
    fn usage(&self) -> &str {
        "remove <category> <id>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let [category, id] = args else {
            return Err(usage_error(self));
        };
        let category = parse_category(category)?;
        env.launcher
            .admin(|panel, _| panel.remove_app(category, id))?;
        done(format!("Removed {id}"))
    }
}

/// `enable` / `disable`.
struct ToggleCmd {
    enable: bool,
}
impl Command for ToggleCmd {
    fn name(&self) -> &str {
        if self.enable { "enable" } else { "disable" }
    }
    fn description(&self) -> &str {
        if self.enable {
            "Show a tile"
        } else {
            "Hide a tile without removing it"
        }
    }
    fn usage(&self) -> &str {
        if self.enable {
            "enable <category> <id>"
        } else {
            "disable <category> <id>"
        }
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let [category, id] = args else {
            return Err(usage_error(self));
        };
        let category = parse_category(category)?;
        let patch = TilePatch::enabled(self.enable);
        env.launcher
            .admin(|panel, _| panel.update_app(category, id, &patch))?;
        done(format!("{id} {}d", self.name()))
    }
}

struct EditCmd;
impl Command for EditCmd {
    fn name(&self) -> &str {
        "edit"
    }
    fn description(&self) -> &str {
        "Change one tile field (label, icon, url, package, order, category)"
    }
    fn usage(&self) -> &str {
        "edit <category> <id> <field> [value]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (category, id, field, value) = match args {
            [c, id, field] => (c, id, field, None),
            [c, id, field, value] => (c, id, field, Some(*value)),
            _ => return Err(usage_error(self)),
        };
        let category = parse_category(category)?;
        let required = || value.ok_or_else(|| usage_error(self));
        let mut patch = TilePatch::default();
        match *field {
            "label" | "name" => patch.label = Some(required()?.to_string()),
            "icon" => patch.icon = Some(required()?.to_string()),
            "url" => patch.url = Some(value.map(str::to_string)),
            "package" => patch.package_name = Some(value.map(str::to_string)),
            "order" => patch.order = Some(parse_number(required()?)?),
            "category" => {
                patch.category = Some(value.map(parse_music_category).transpose()?);
            },
            other => return Err(TvboxError::Command(format!("unknown tile field: {other}"))),
        }
        env.launcher
            .admin(|panel, _| panel.update_app(category, id, &patch))?;
        let note = patch
            .icon
            .as_deref()
            .map(|icon| icon_note(env.launcher, icon))
            .unwrap_or_default();
        done(format!("Updated {id}{note}"))
    }
}

fn parse_music_category(name: &str) -> Result<MusicCategory> {
    match name.to_ascii_lowercase().as_str() {
        "streaming" => Ok(MusicCategory::Streaming),
        "local" => Ok(MusicCategory::Local),
        "radio" => Ok(MusicCategory::Radio),
        _ => Err(TvboxError::Command(format!("unknown music category: {name}"))),
    }
}

struct MoveCmd;
impl Command for MoveCmd {
    fn name(&self) -> &str {
        "move"
    }
    fn description(&self) -> &str {
        "Move a tile to a position (0-based) and renumber its grid"
    }
    fn usage(&self) -> &str {
        "move <category> <id> <position>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let [category, id, position] = args else {
            return Err(usage_error(self));
        };
        let category = parse_category(category)?;
        let position: usize = parse_number(position)?;
        env.launcher
            .admin(|panel, _| panel.move_app(category, id, position))?;
        done(format!("Moved {id} to {position}"))
    }
}

// ---------------------------------------------------------------------------
// Banner, theme, clock, password
// ---------------------------------------------------------------------------

struct BannerCmd;
impl Command for BannerCmd {
    fn name(&self) -> &str {
        "banner"
    }
    fn description(&self) -> &str {
        "Edit the banner (title, subtitle, logo, url, image, bg, text, on, off)"
    }
    fn usage(&self) -> &str {
        "banner <field> [value]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut patch = BannerPatch::default();
        match args {
            ["on"] => patch.enabled = Some(true),
            ["off"] => patch.enabled = Some(false),
            ["image"] => patch.background_image = Some(None),
            ["image", value] => patch.background_image = Some(Some((*value).to_string())),
            [field, value] => {
                let value = Some((*value).to_string());
                match *field {
                    "title" => patch.title = value,
                    "subtitle" => patch.subtitle = value,
                    "logo" => patch.logo = value,
                    "url" => patch.url = value,
                    "bg" => patch.background_color = value,
                    "text" => patch.text_color = value,
                    other => {
                        return Err(TvboxError::Command(format!("unknown banner field: {other}")));
                    },
                }
            },
            _ => return Err(usage_error(self)),
        }
        env.launcher.admin(|panel, _| panel.update_banner(&patch))?;
        done("Banner updated")
    }
}

struct ThemeCmd;
impl Command for ThemeCmd {
    fn name(&self) -> &str {
        "theme"
    }
    fn description(&self) -> &str {
        "Show the published style, or set a color (primary, secondary, accent, background, foreground, card)"
    }
    fn usage(&self) -> &str {
        "theme [<color> <value>]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let (name, value) = match args {
            [] => {
                let lines: Vec<String> = env
                    .launcher
                    .style()
                    .iter()
                    .map(|(var, value)| format!("{var} = {value}"))
                    .collect();
                return done(lines.join("\n"));
            },
            [name, value] => (name, value),
            _ => return Err(usage_error(self)),
        };
        let patch = ThemePatch::color(name, *value)
            .ok_or_else(|| TvboxError::Command(format!("unknown theme color: {name}")))?;
        env.launcher.admin(|panel, _| panel.update_theme(&patch))?;
        done(format!("{name} = {value}"))
    }
}

struct ClockCmd;
impl Command for ClockCmd {
    fn name(&self) -> &str {
        "clock"
    }
    fn description(&self) -> &str {
        "Configure the clock (on, off, position, format, date, seconds)"
    }
    fn usage(&self) -> &str {
        "clock <on|off> | clock <setting> <value>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut patch = ClockPatch::default();
        match args {
            [switch] => patch.enabled = Some(parse_switch(switch)?),
            ["position", corner] => {
                patch.position = Some(
                    Corner::from_name(corner)
                        .ok_or_else(|| TvboxError::Command(format!("unknown corner: {corner}")))?,
                );
            },
            ["format", format] => {
                patch.format = Some(
                    HourFormat::from_name(format)
                        .ok_or_else(|| TvboxError::Command(format!("unknown format: {format}")))?,
                );
            },
            ["date", switch] => patch.show_date = Some(parse_switch(switch)?),
            ["seconds", switch] => patch.show_seconds = Some(parse_switch(switch)?),
            _ => return Err(usage_error(self)),
        }
        env.launcher.admin(|panel, _| panel.update_clock(&patch))?;
        done("Clock updated")
    }
}

struct PasswordCmd;
impl Command for PasswordCmd {
    fn name(&self) -> &str {
        "password"
    }
    fn description(&self) -> &str {
        "Change the admin password"
    }
    fn usage(&self) -> &str {
        "password <new>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let [password] = args else {
            return Err(usage_error(self));
        };
        env.launcher
            .admin(|panel, _| panel.change_password(password))?;
        done("Password changed")
    }
}

// ---------------------------------------------------------------------------
// Local music
// ---------------------------------------------------------------------------

struct MusicCmd;
impl Command for MusicCmd {
    fn name(&self) -> &str {
        "music"
    }
    fn description(&self) -> &str {
        "Manage local tracks (list, import, remove, play, rename, artist, album, enable, disable)"
    }
    fn usage(&self) -> &str {
        "music <action> [args]"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        match args {
            ["list"] | [] => {
                let tracks = &env.launcher.settings().apps.local_music;
                let mut lines = vec![format!("{} tracks enabled", music::enabled_count(tracks))];
                for track in music::sorted(tracks) {
                    let playing = if env.launcher.previewer().is_playing(&track.id) {
                        " [playing]"
                    } else {
                        ""
                    };
                    lines.push(format!(
                        "  {:<24} {} - {} ({}){playing}",
                        track.id,
                        track.artist,
                        track.title,
                        music::format_duration(track.duration_secs)
                    ));
                }
                done(lines.join("\n"))
            },
            ["import", file] | ["import", file, _] => {
                let duration: f64 = match args {
                    [_, _, secs] => parse_number(secs)?,
                    _ => 0.0,
                };
                let n = env.launcher.settings().apps.local_music.len();
                let id = format!("music-{}-{n}", env.now_millis);
                env.launcher
                    .admin(|panel, handles| panel.import_track(&id, file, duration, handles))?;
                done(format!("Imported {file} as {id}"))
            },
            ["remove", id] => {
                env.launcher.remove_track(id, &mut *env.audio)?;
                done(format!("Removed {id}"))
            },
            ["play", id] => {
                let playing = env.launcher.preview(id, &mut *env.audio)?;
                done(if playing { "Playing" } else { "Paused" })
            },
            [field @ ("rename" | "artist" | "album"), id, value] => {
                let value = Some((*value).to_string());
                let patch = match *field {
                    "rename" => music::TrackPatch {
                        title: value,
                        ..Default::default()
                    },
                    "artist" => music::TrackPatch {
                        artist: value,
                        ..Default::default()
                    },
                    _ => music::TrackPatch {
                        album: value,
                        ..Default::default()
                    },
                };
                env.launcher
                    .admin(|panel, _| panel.update_track(id, &patch))?;
                done(format!("Updated {id}"))
            },
            [switch @ ("enable" | "disable"), id] => {
                let patch = music::TrackPatch {
                    enabled: Some(*switch == "enable"),
                    ..Default::default()
                };
                env.launcher
                    .admin(|panel, _| panel.update_track(id, &patch))?;
                done(format!("{id} {switch}d"))
            },
            _ => Err(usage_error(self)),
        }
    }
}
