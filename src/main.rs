use clap::Parser;
use gtk::prelude::*;
use gtk::Application;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

mod album_art;
mod config;
mod mpd_client;
mod picker;
mod poller;
mod scroller;
mod theme;
mod ui;
mod user_command;

#[cfg(test)]
mod test_support;

use config::Config;
use mpd_client::MpdSession;
use ui::PlayerWindow;

const APP_ID: &str = "com.cassette.player";

#[derive(Parser, Debug)]
#[command(name = "cassette", version, about = "A small GTK front-end for MPD")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// MPD host, overrides the config file
    #[arg(long)]
    host: Option<String>,

    /// MPD port, overrides the config file
    #[arg(long)]
    port: Option<u16>,

    /// Music directory used for album art lookup
    #[arg(long)]
    music_dir: Option<PathBuf>,
}

fn main() -> glib::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = load_config(&cli, &config_path);
    let themes_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::config_dir)
        .join("themes");

    let session = match MpdSession::connect(&config.host, config.port) {
        Ok(session) => Rc::new(RefCell::new(session)),
        Err(e) => {
            log::error!("Error connecting to MPD at {}:{}: {}", config.host, config.port, e);
            return glib::ExitCode::FAILURE;
        }
    };

    let app = Application::builder().application_id(APP_ID).build();
    app.connect_activate(move |app| build_ui(app, &config, &themes_dir, &session));

    // clap already consumed our flags, GTK only gets the program name
    let gtk_args: Vec<String> = std::env::args().take(1).collect();
    app.run_with_args(&gtk_args)
}

fn load_config(cli: &Cli, path: &Path) -> Config {
    let mut config = match Config::load_or_create(path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{:#}, using defaults", e);
            Config::default()
        }
    };
    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(dir) = &cli.music_dir {
        config.music_dir = Some(dir.clone());
    }
    config
}

fn build_ui(app: &Application, config: &Config, themes_dir: &Path, session: &Rc<RefCell<MpdSession>>) {
    if let Some(window) = app.active_window() {
        window.present();
        return;
    }
    let window = PlayerWindow::new(app, config, themes_dir, session.clone());
    window.show();
}
