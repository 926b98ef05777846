use gdk_pixbuf::Pixbuf;
use gtk::prelude::*;
use gtk::{
    Align, Application, ApplicationWindow, Box as GtkBox, Button, CellRendererText, IconSize,
    Image, Label, ListStore, Orientation, PolicyType, ProgressBar, Scale, ScrolledWindow,
    SearchEntry, SelectionMode, Stack, ToggleButton, TreeView, TreeViewColumn, Window,
};
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use crate::album_art::{AlbumArt, ArtResolver};
use crate::config::{Config, SongFormat};
use crate::mpd_client::{MpdSession, PlaybackStatus, Session, SessionResult};
use crate::picker::{self, PlaybackOption};
use crate::poller::{self, DisplaySurface, StatePoller};
use crate::scroller::{self, ScrollStep, TextScroller};
use crate::theme::Theme;
use crate::user_command::UserCommand;

/// Characters visible in the now-playing field.
const SONG_DISPLAY_WIDTH: usize = 34;
const ART_SIZE: u32 = 300;
const CLOCK_INTERVAL: Duration = Duration::from_secs(1);

type SharedSession = Rc<RefCell<MpdSession>>;
type SharedPoller = Rc<RefCell<StatePoller<MpdSession>>>;

/// Widgets the poller renders into. Cheap to clone: every field is a GTK
/// handle or shared cell.
#[derive(Clone)]
pub struct GtkDisplay {
    song_label: Label,
    song_text: Rc<RefCell<String>>,
    scroller: Rc<RefCell<TextScroller>>,
    pause_source: Rc<RefCell<Option<glib::SourceId>>>,
    progress_bar: ProgressBar,
    volume_scale: Scale,
    play_toggle: ToggleButton,
    // set while we push server state into widgets so their handlers stay quiet
    syncing: Rc<Cell<bool>>,
    art_stack: Stack,
    art_image: Image,
}

impl GtkDisplay {
    fn synced(&self, f: impl FnOnce()) {
        self.syncing.set(true);
        f();
        self.syncing.set(false);
    }

    fn show_window_at(&self, cursor: usize) {
        let text = self.song_text.borrow();
        self.song_label
            .set_text(&scroller::visible_window(&text, cursor, SONG_DISPLAY_WIDTH));
    }

    fn cancel_pause(&self) {
        if let Some(source) = self.pause_source.borrow_mut().take() {
            source.remove();
        }
    }

    fn scroll_step(&self) {
        let step = self.scroller.borrow_mut().step();
        match step {
            ScrollStep::Advanced(cursor) => self.show_window_at(cursor),
            ScrollStep::Pause(generation) => {
                let display = self.clone();
                let source = glib::timeout_add_local_once(scroller::END_PAUSE, move || {
                    // the source is finishing, forget it without removing
                    display.pause_source.borrow_mut().take();
                    if display.scroller.borrow_mut().finish_pause(generation) {
                        display.show_window_at(0);
                    }
                });
                *self.pause_source.borrow_mut() = Some(source);
            }
            ScrollStep::Waiting => {}
        }
    }
}

impl DisplaySurface for GtkDisplay {
    fn render_song_text(&mut self, text: &str) {
        self.cancel_pause();
        self.scroller.borrow_mut().set_text(text);
        *self.song_text.borrow_mut() = text.to_string();
        self.show_window_at(0);
    }

    fn render_progress(&mut self, percent: u8, elapsed: &str, total: &str) {
        self.progress_bar.set_fraction(f64::from(percent) / 100.0);
        self.progress_bar
            .set_text(Some(&format!("{} / {}", elapsed, total)));
    }

    fn render_volume(&mut self, volume: u8) {
        let scale = self.volume_scale.clone();
        self.synced(|| scale.set_value(f64::from(volume)));
    }

    fn render_album_art(&mut self, art: Option<&AlbumArt>) {
        match art.map(art_pixbuf) {
            Some(pixbuf) => {
                self.art_image.set_from_pixbuf(Some(&pixbuf));
                self.art_stack.set_visible_child_name("art");
            }
            None => {
                self.art_image.clear();
                self.art_stack.set_visible_child_name("placeholder");
            }
        }
    }

    fn render_status(&mut self, status: PlaybackStatus) {
        let toggle = self.play_toggle.clone();
        self.synced(|| toggle.set_active(status == PlaybackStatus::Playing));
    }
}

fn art_pixbuf(art: &AlbumArt) -> Pixbuf {
    let scaled = art
        .image
        .resize(ART_SIZE, ART_SIZE, image::imageops::FilterType::Triangle)
        .to_rgba8();
    let (width, height) = scaled.dimensions();
    Pixbuf::from_bytes(
        &glib::Bytes::from_owned(scaled.into_raw()),
        gdk_pixbuf::Colorspace::Rgb,
        true,
        8,
        width as i32,
        height as i32,
        (width * 4) as i32,
    )
}

fn clock_text() -> Option<String> {
    let now = glib::DateTime::now_local().ok()?;
    now.format("%H:%M").ok().map(|s| s.to_string())
}

fn control_button(icon: &str, tooltip: &str) -> Button {
    let button = Button::from_icon_name(Some(icon), IconSize::Button);
    button.set_tooltip_text(Some(tooltip));
    button.style_context().add_class("control-button");
    button
}

/// Runs a one-off session command from a button handler.
fn run_command(session: &SharedSession, what: &str, command: impl FnOnce(&mut MpdSession) -> SessionResult<()>) {
    match session.try_borrow_mut() {
        Ok(mut session) => {
            if let Err(e) = command(&mut session) {
                log::warn!("An error occurred while executing {} command: {}", what, e);
            }
        }
        Err(_) => log::debug!("Session busy, dropping {} command", what),
    }
}

fn refresh(poller: &SharedPoller, display: &GtkDisplay) {
    if let Ok(mut poller) = poller.try_borrow_mut() {
        if let Err(e) = poller.refresh(&mut display.clone()) {
            log::warn!("Could not refresh the song display: {}", e);
        }
    }
}

fn hide_on_close(window: &Window) {
    window.connect_delete_event(|window, _| {
        window.hide();
        glib::Propagation::Stop
    });
}

fn hide_on_quit_keys(window: &Window) {
    window.connect_key_press_event(|window, event| {
        let key = event.keyval();
        if key == gdk::keys::constants::q || key == gdk::keys::constants::Escape {
            window.hide();
            return glib::Propagation::Stop;
        }
        glib::Propagation::Proceed
    });
}

pub struct PlayerWindow {
    window: ApplicationWindow,
    session: SharedSession,
    poller: SharedPoller,
    display: GtkDisplay,
    clock_label: Label,
    prev_btn: Button,
    stop_btn: Button,
    next_btn: Button,
    picker_btn: Button,
    album_btn: Button,
    options_btn: Button,
    album_window: Window,
    picker: SongPickerWindow,
    options: OptionsWindow,
    timers: Rc<RefCell<Vec<glib::SourceId>>>,
    closing: Rc<Cell<bool>>,
}

impl PlayerWindow {
    pub fn new(app: &Application, config: &Config, themes_dir: &Path, session: SharedSession) -> Self {
        Theme::resolve(&config.theme, themes_dir).apply();

        let window = ApplicationWindow::builder()
            .application(app)
            .title("Cassette")
            .default_width(400)
            .default_height(160)
            .resizable(false)
            .build();

        // Main container
        let main_box = GtkBox::new(Orientation::Vertical, 6);
        main_box.set_margin_start(5);
        main_box.set_margin_end(5);
        main_box.set_margin_top(5);
        main_box.set_margin_bottom(5);

        // Clock and now-playing
        let display_row = GtkBox::new(Orientation::Horizontal, 8);
        let clock_label = Label::new(clock_text().as_deref());
        clock_label.style_context().add_class("clock");
        display_row.pack_start(&clock_label, false, false, 0);

        // Scrolling song label, progress bar underneath
        let song_box = GtkBox::new(Orientation::Vertical, 2);
        let song_label = Label::new(None);
        song_label.style_context().add_class("song-display");
        song_label.set_width_chars(SONG_DISPLAY_WIDTH as i32);
        song_label.set_max_width_chars(SONG_DISPLAY_WIDTH as i32);
        song_label.set_xalign(0.0);
        song_label.set_single_line_mode(true);
        song_box.pack_start(&song_label, false, false, 0);

        let progress_bar = ProgressBar::new();
        progress_bar.set_show_text(true);
        progress_bar.set_text(Some("0:00 / 0:00"));
        song_box.pack_start(&progress_bar, false, false, 0);
        display_row.pack_start(&song_box, true, true, 0);
        main_box.pack_start(&display_row, false, false, 0);

        // Volume
        let volume_scale = Scale::with_range(Orientation::Horizontal, 0.0, 100.0, 1.0);
        volume_scale.set_draw_value(false);
        volume_scale.style_context().add_class("volume-scale");
        main_box.pack_start(&volume_scale, false, false, 0);

        // Controls
        let controls = GtkBox::new(Orientation::Horizontal, 6);
        controls.set_halign(Align::Center);
        let prev_btn = control_button("media-skip-backward-symbolic", "Previous");
        let stop_btn = control_button("media-playback-stop-symbolic", "Stop");
        // Play/pause toggle
        let play_toggle = ToggleButton::new();
        play_toggle.set_image(Some(&Image::from_icon_name(
            Some("media-playback-start-symbolic"),
            IconSize::Button,
        )));
        play_toggle.set_tooltip_text(Some("Play / Pause"));
        play_toggle.style_context().add_class("control-button");
        let picker_btn = control_button("list-add-symbolic", "Song picker");
        let next_btn = control_button("media-skip-forward-symbolic", "Next");
        let album_btn = control_button("image-x-generic-symbolic", "Album art");
        let options_btn = control_button("emblem-system-symbolic", "Playback options");
        for button in [&prev_btn, &stop_btn] {
            controls.pack_start(button, false, false, 0);
        }
        controls.pack_start(&play_toggle, false, false, 0);
        for button in [&picker_btn, &next_btn, &album_btn, &options_btn] {
            controls.pack_start(button, false, false, 0);
        }
        main_box.pack_start(&controls, false, false, 0);
        window.add(&main_box);

        // Album art window
        let album_window = Window::new(gtk::WindowType::Toplevel);
        album_window.set_title("Cassette - Album Art");
        album_window.set_default_size(ART_SIZE as i32, ART_SIZE as i32);
        album_window.set_resizable(false);
        album_window.set_transient_for(Some(&window));
        album_window.set_destroy_with_parent(true);
        // Art and placeholder share a stack
        let art_stack = Stack::new();
        let art_image = Image::new();
        let placeholder = Label::new(Some("No album art found."));
        placeholder.set_halign(Align::Center);
        placeholder.set_valign(Align::Center);
        placeholder.style_context().add_class("art-placeholder");
        art_image.show();
        placeholder.show();
        art_stack.add_named(&art_image, "art");
        art_stack.add_named(&placeholder, "placeholder");
        art_stack.set_visible_child_name("placeholder");
        album_window.add(&art_stack);
        hide_on_close(&album_window);
        hide_on_quit_keys(&album_window);

        // Display surface handed to the poller
        let display = GtkDisplay {
            song_label,
            song_text: Rc::new(RefCell::new(String::new())),
            scroller: Rc::new(RefCell::new(TextScroller::new())),
            pause_source: Rc::new(RefCell::new(None)),
            progress_bar,
            volume_scale,
            play_toggle,
            syncing: Rc::new(Cell::new(false)),
            art_stack,
            art_image,
        };

        // Poller
        let format = SongFormat::from_names(&config.song_format);
        let mut state_poller = StatePoller::new(
            session.clone(),
            format,
            UserCommand::new(&config.run_on_song_change),
        );

        // Album art follows every song change
        let resolver = ArtResolver::new(config.resolved_music_dir());
        let art_session = session.clone();
        let mut art_display = display.clone();
        state_poller.subscribe(move |song| {
            let art = match art_session.try_borrow_mut() {
                Ok(mut session) => resolver.resolve(&mut *session, song),
                Err(_) => None,
            };
            art_display.render_album_art(art.as_ref());
        });
        let poller = Rc::new(RefCell::new(state_poller));

        // Secondary windows
        let picker = SongPickerWindow::new(&window);
        let options = OptionsWindow::new(&window);

        let player = Self {
            window,
            session,
            poller,
            display,
            clock_label,
            prev_btn,
            stop_btn,
            next_btn,
            picker_btn,
            album_btn,
            options_btn,
            album_window,
            picker,
            options,
            timers: Rc::new(RefCell::new(Vec::new())),
            closing: Rc::new(Cell::new(false)),
        };

        player.connect_signals();
        player.startup();
        player
    }

    fn connect_signals(&self) {
        // Transport buttons
        let session = self.session.clone();
        self.prev_btn.connect_clicked(move |_| run_command(&session, "previous song", |s| s.previous()));

        let session = self.session.clone();
        self.next_btn.connect_clicked(move |_| run_command(&session, "next song", |s| s.next()));

        let session = self.session.clone();
        let poller = self.poller.clone();
        let display = self.display.clone();
        self.stop_btn.connect_clicked(move |_| {
            run_command(&session, "stop", |s| s.stop());
            refresh(&poller, &display);
        });

        // Play/pause
        let session = self.session.clone();
        let poller = self.poller.clone();
        let display = self.display.clone();
        self.display.play_toggle.connect_toggled(move |toggle| {
            if display.syncing.get() {
                return;
            }
            if toggle.is_active() {
                run_command(&session, "play", |s| s.play());
            } else {
                run_command(&session, "pause", |s| s.pause());
            }
            refresh(&poller, &display);
        });

        // Volume slider
        let session = self.session.clone();
        let poller = self.poller.clone();
        let syncing = self.display.syncing.clone();
        self.display.volume_scale.connect_value_changed(move |scale| {
            if syncing.get() {
                return;
            }
            let volume = scale.value().round().clamp(0.0, 100.0) as u8;
            run_command(&session, "set volume", |s| s.set_volume(volume));
            if let Ok(mut poller) = poller.try_borrow_mut() {
                poller.note_volume(volume);
            }
        });

        // Windows
        let album_window = self.album_window.clone();
        self.album_btn.connect_clicked(move |_| album_window.show_all());

        let picker = self.picker.clone();
        let session = self.session.clone();
        let poller = self.poller.clone();
        let display = self.display.clone();
        self.picker_btn.connect_clicked(move |_| picker.open(&session, &poller, &display));

        let options = self.options.clone();
        let session = self.session.clone();
        self.options_btn.connect_clicked(move |_| options.open(&session));

        // Shutdown
        let timers = self.timers.clone();
        let poller = self.poller.clone();
        let display = self.display.clone();
        self.window.connect_destroy(move |_| {
            for source in timers.borrow_mut().drain(..) {
                source.remove();
            }
            display.cancel_pause();
            match poller.try_borrow_mut() {
                Ok(mut poller) => poller.shutdown(),
                Err(_) => log::warn!("Poller busy during shutdown"),
            }
        });
    }

    fn startup(&self) {
        if let Err(e) = self.poller.borrow_mut().startup(&mut self.display.clone()) {
            log::error!("Could not read the initial MPD state: {}", e);
            self.close_soon();
        }

        let mut timers = self.timers.borrow_mut();

        // Song change poll
        let poller = self.poller.clone();
        let mut display = self.display.clone();
        let player = self.closer();
        timers.push(glib::timeout_add_local(poller::SONG_POLL_INTERVAL, move || {
            let result = match poller.try_borrow_mut() {
                Ok(mut poller) => poller.tick(&mut display).map(|_| ()),
                Err(_) => Ok(()),
            };
            if let Err(e) = result {
                log::error!("Connection error: {}", e);
                player.close_soon();
            }
            glib::ControlFlow::Continue
        }));

        // Progress and volume poll
        let poller = self.poller.clone();
        let mut display = self.display.clone();
        let player = self.closer();
        timers.push(glib::timeout_add_local(poller::PROGRESS_POLL_INTERVAL, move || {
            let result = match poller.try_borrow_mut() {
                Ok(mut poller) => poller.update_progress(&mut display),
                Err(_) => Ok(()),
            };
            if let Err(e) = result.as_ref() {
                if poller::is_fatal(e) {
                    log::error!("Connection error: {}", e);
                    player.close_soon();
                }
            }
            glib::ControlFlow::Continue
        }));

        // Scroll
        let display = self.display.clone();
        timers.push(glib::timeout_add_local(scroller::STEP_INTERVAL, move || {
            display.scroll_step();
            glib::ControlFlow::Continue
        }));

        // Clock
        let clock_label = self.clock_label.clone();
        timers.push(glib::timeout_add_local(CLOCK_INTERVAL, move || {
            if let Some(text) = clock_text() {
                if clock_label.text().as_str() != text {
                    clock_label.set_text(&text);
                }
            }
            glib::ControlFlow::Continue
        }));
    }

    fn closer(&self) -> WindowCloser {
        WindowCloser {
            window: self.window.clone(),
            closing: self.closing.clone(),
        }
    }

    fn close_soon(&self) {
        self.closer().close_soon();
    }

    pub fn show(&self) {
        self.window.show_all();
    }
}

/// Closes the main window from inside a timer callback, once.
#[derive(Clone)]
struct WindowCloser {
    window: ApplicationWindow,
    closing: Rc<Cell<bool>>,
}

impl WindowCloser {
    fn close_soon(&self) {
        if self.closing.replace(true) {
            return;
        }
        // closing runs the destroy handler, which needs the poller we may be borrowing
        let window = self.window.clone();
        glib::idle_add_local_once(move || window.close());
    }
}

#[derive(Clone)]
struct SongPickerWindow {
    window: Window,
    search: SearchEntry,
    store: ListStore,
    filter: gtk::TreeModelFilter,
    view: TreeView,
    add_btn: Button,
    cancel_btn: Button,
    clear_btn: Button,
    // handlers are wired on first open, when the session is known
    wired: Rc<Cell<bool>>,
}

impl SongPickerWindow {
    fn new(parent: &ApplicationWindow) -> Self {
        let window = Window::new(gtk::WindowType::Toplevel);
        window.set_title("Cassette - Song Picker");
        window.set_default_size(410, 600);
        window.set_transient_for(Some(parent));
        window.set_destroy_with_parent(true);

        let vbox = GtkBox::new(Orientation::Vertical, 6);
        vbox.set_margin_start(8);
        vbox.set_margin_end(8);
        vbox.set_margin_top(8);
        vbox.set_margin_bottom(8);

        // Search
        let search = SearchEntry::new();
        search.set_placeholder_text(Some("Search..."));
        vbox.pack_start(&search, false, false, 0);

        // Store: (label, file)
        let store = ListStore::new(&[glib::Type::STRING, glib::Type::STRING]);
        let filter = gtk::TreeModelFilter::new(&store, None);
        let search_for_filter = search.clone();
        filter.set_visible_func(move |model, iter| {
            let label = model.value(iter, 0).get::<String>().unwrap_or_default();
            picker::matches_query(&label, &search_for_filter.text())
        });

        // Song list
        let view = TreeView::with_model(&filter);
        view.set_headers_visible(false);
        view.selection().set_mode(SelectionMode::Multiple);
        let column = TreeViewColumn::new();
        let renderer = CellRendererText::new();
        renderer.set_property("ellipsize", gtk::pango::EllipsizeMode::End);
        gtk::prelude::CellLayoutExt::pack_start(&column, &renderer, true);
        gtk::prelude::CellLayoutExt::add_attribute(&column, &renderer, "text", 0);
        view.append_column(&column);

        let scroll = ScrolledWindow::new(None::<&gtk::Adjustment>, None::<&gtk::Adjustment>);
        scroll.set_policy(PolicyType::Never, PolicyType::Automatic);
        scroll.add(&view);
        vbox.pack_start(&scroll, true, true, 0);

        // Buttons
        let buttons = GtkBox::new(Orientation::Horizontal, 6);
        buttons.set_homogeneous(true);
        let add_btn = Button::with_label("Add");
        let cancel_btn = Button::with_label("Cancel");
        let clear_btn = Button::with_label("Clear Queue");
        for button in [&add_btn, &cancel_btn, &clear_btn] {
            button.style_context().add_class("option-button");
            buttons.pack_start(button, true, true, 0);
        }
        vbox.pack_start(&buttons, false, false, 0);
        window.add(&vbox);
        hide_on_close(&window);

        let filter_for_search = filter.clone();
        search.connect_search_changed(move |_| filter_for_search.refilter());

        Self {
            window,
            search,
            store,
            filter,
            view,
            add_btn,
            cancel_btn,
            clear_btn,
            wired: Rc::new(Cell::new(false)),
        }
    }

    fn open(&self, session: &SharedSession, poller: &SharedPoller, display: &GtkDisplay) {
        if !self.wired.replace(true) {
            self.wire(session, poller, display);
        }
        self.reload(session);
        self.search.set_text("");
        self.view.selection().unselect_all();
        self.window.show_all();
        self.window.present();
    }

    fn wire(&self, session: &SharedSession, poller: &SharedPoller, display: &GtkDisplay) {
        let this = self.clone();
        let session_for_add = session.clone();
        let poller = poller.clone();
        let display = display.clone();
        self.add_btn.connect_clicked(move |_| {
            let files = this.selected_files();
            run_command(&session_for_add, "add songs", |s| picker::enqueue(s, &files).map(|_| ()));
            this.window.hide();
            refresh(&poller, &display);
        });

        let window = self.window.clone();
        self.cancel_btn.connect_clicked(move |_| window.hide());

        let session = session.clone();
        self.clear_btn.connect_clicked(move |_| run_command(&session, "clear queue", |s| s.clear_queue()));
    }

    fn reload(&self, session: &SharedSession) {
        let entries = match session.try_borrow_mut() {
            Ok(mut session) => session.list_all_songs(),
            Err(_) => return,
        };
        match entries {
            Ok(entries) => {
                self.store.clear();
                for entry in &entries {
                    let iter = self.store.append();
                    self.store.set(&iter, &[
                        (0, &picker::entry_label(entry).to_value()),
                        (1, &entry.file.to_value()),
                    ]);
                }
                self.filter.refilter();
            }
            Err(e) => log::warn!("Could not list the music library: {}", e),
        }
    }

    fn selected_files(&self) -> Vec<String> {
        let (paths, model) = self.view.selection().selected_rows();
        paths
            .iter()
            .filter_map(|path| model.iter(path))
            .filter_map(|iter| model.value(&iter, 1).get::<String>().ok())
            .collect()
    }
}

#[derive(Clone)]
struct OptionsWindow {
    window: Window,
    toggles: Vec<(PlaybackOption, ToggleButton)>,
    syncing: Rc<Cell<bool>>,
    wired: Rc<Cell<bool>>,
}

impl OptionsWindow {
    fn new(parent: &ApplicationWindow) -> Self {
        let window = Window::new(gtk::WindowType::Toplevel);
        window.set_title("Options");
        window.set_default_size(160, 160);
        window.set_resizable(false);
        window.set_transient_for(Some(parent));
        window.set_destroy_with_parent(true);

        let vbox = GtkBox::new(Orientation::Vertical, 5);
        vbox.set_margin_start(5);
        vbox.set_margin_end(5);
        vbox.set_margin_top(5);
        vbox.set_margin_bottom(5);
        vbox.set_halign(Align::Center);
        vbox.pack_start(&Label::new(Some("Playback Options")), false, false, 0);

        let toggles: Vec<(PlaybackOption, ToggleButton)> = PlaybackOption::ALL
            .iter()
            .map(|&option| {
                let toggle = ToggleButton::with_label(&option.label(false));
                toggle.set_size_request(100, 25);
                toggle.style_context().add_class("option-button");
                vbox.pack_start(&toggle, false, false, 0);
                (option, toggle)
            })
            .collect();

        window.add(&vbox);
        hide_on_close(&window);

        Self {
            window,
            toggles,
            syncing: Rc::new(Cell::new(false)),
            wired: Rc::new(Cell::new(false)),
        }
    }

    fn open(&self, session: &SharedSession) {
        if !self.wired.replace(true) {
            for (option, toggle) in &self.toggles {
                let option = *option;
                let session = session.clone();
                let syncing = self.syncing.clone();
                toggle.connect_toggled(move |toggle| {
                    if syncing.get() {
                        return;
                    }
                    let enabled = toggle.is_active();
                    run_command(&session, option.name(), |s| option.apply(s, enabled));
                    toggle.set_label(&option.label(enabled));
                });
            }
        }

        // Sync toggles with the server
        let status = match session.try_borrow_mut() {
            Ok(mut session) => session.status(),
            Err(_) => return,
        };
        match status {
            Ok(status) => {
                self.syncing.set(true);
                for (option, toggle) in &self.toggles {
                    let enabled = option.is_enabled(&status);
                    toggle.set_active(enabled);
                    toggle.set_label(&option.label(enabled));
                }
                self.syncing.set(false);
            }
            Err(e) => log::warn!("Could not read playback options: {}", e),
        }
        self.window.show_all();
        self.window.present();
    }
}
