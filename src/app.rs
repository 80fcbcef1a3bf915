use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::Theme;
use crate::catalog::REFERENCE_POINT;
use crate::commands::{Command, RequestLocationCmd};
use crate::config::{FilterDefaults, GlobalAction, KeyResolver};
use crate::location::{LocationProvider, LocationState, Permission};
use crate::screen::{BookingScreen, ListingScreen, LocationTicket, ScreenId, ScreenMsg};
use crate::tui::{Event, Tui};
use crate::ui::{
    Component, ConfirmDialog, ConfirmEvent, ErrorDialog, ErrorDialogEvent, EventResult, Result,
    Screen, StatusBar, Toast, ToastManager, ToastType,
};

/// Messages delivered to the App through its channel.
#[derive(Debug)]
pub enum AppMessage {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,

    /// Ask the user for location permission and answer through `reply`.
    PermissionPrompt(oneshot::Sender<Permission>),
    /// A location request moved to `state`.
    Location {
        ticket: LocationTicket,
        state: LocationState,
    },
    ShowToast {
        message: String,
        toast_type: ToastType,
    },
    DisplayError(String),
}

enum Route {
    Listing(Box<ListingScreen>),
    Booking(BookingScreen),
}

struct Mounted {
    id: ScreenId,
    route: Route,
}

impl Mounted {
    fn screen(&mut self) -> &mut dyn Screen<Msg = ScreenMsg> {
        match &mut self.route {
            Route::Listing(screen) => screen.as_mut(),
            Route::Booking(screen) => screen,
        }
    }

    fn screen_ref(&self) -> &dyn Screen<Msg = ScreenMsg> {
        match &self.route {
            Route::Listing(screen) => screen.as_ref(),
            Route::Booking(screen) => screen,
        }
    }
}

struct PendingPermission {
    dialog: ConfirmDialog,
    reply: oneshot::Sender<Permission>,
}

/// What the first screen starts with.
pub struct Launch {
    pub filters: FilterDefaults,
    pub request_location: bool,
}

pub struct App {
    stack: Vec<Mounted>,
    next_screen: u64,
    provider: Arc<LocationProvider>,
    resolver: Arc<KeyResolver>,
    theme: Theme,
    status_bar: StatusBar,
    toasts: ToastManager,
    error: Option<ErrorDialog>,
    permission: Option<PendingPermission>,
    request_on_start: bool,
    should_quit: bool,
    should_suspend: bool,
    app_tx: UnboundedSender<AppMessage>,
    app_rx: UnboundedReceiver<AppMessage>,
}

impl App {
    /// `channel` must be the one the provider's permission prompt sends on.
    pub fn new(
        launch: Launch,
        provider: Arc<LocationProvider>,
        resolver: Arc<KeyResolver>,
        theme: Theme,
        channel: (UnboundedSender<AppMessage>, UnboundedReceiver<AppMessage>),
    ) -> Self {
        let (app_tx, app_rx) = channel;
        let mut app = Self {
            stack: Vec::new(),
            next_screen: 0,
            status_bar: StatusBar::new(resolver.clone()),
            provider,
            resolver,
            theme,
            toasts: ToastManager::new(),
            error: None,
            permission: None,
            request_on_start: launch.request_location,
            should_quit: false,
            should_suspend: false,
            app_tx,
            app_rx,
        };

        let id = app.allocate_id();
        let listing = ListingScreen::new(
            &launch.filters.neighborhood,
            &launch.filters.radius,
            launch.filters.category,
            app.provider.platform(),
            REFERENCE_POINT,
            app.resolver.clone(),
        );
        app.stack.push(Mounted {
            id,
            route: Route::Listing(Box::new(listing)),
        });
        app
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new(30.0, 8.0)?;
        tui.enter()?;

        if self.request_on_start {
            self.request_location_for_root();
        }

        loop {
            self.handle_events(&mut tui).await?;
            self.handle_messages(&mut tui)?;
            if self.should_suspend {
                tui.suspend()?;
                self.app_tx.send(AppMessage::Resume)?;
                tui.resume()?;
            } else if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        info!("Exiting");
        Ok(())
    }

    fn allocate_id(&mut self) -> ScreenId {
        self.next_screen += 1;
        ScreenId(self.next_screen)
    }

    fn request_location_for_root(&mut self) {
        let Some(mounted) = self.stack.first_mut() else {
            return;
        };
        let id = mounted.id;
        if let Route::Listing(listing) = &mut mounted.route {
            let msg = listing.begin_location_request();
            self.handle_screen_msg(id, msg);
        }
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> Result<()> {
        let Some(event) = tui.next_event().await else {
            return Ok(());
        };

        match event {
            Event::Quit => self.app_tx.send(AppMessage::Quit)?,
            Event::Suspend => self.app_tx.send(AppMessage::Suspend)?,
            Event::Tick => self.app_tx.send(AppMessage::Tick)?,
            Event::Render => self.app_tx.send(AppMessage::Render)?,
            Event::Resize(width, height) => self.app_tx.send(AppMessage::Resize(width, height))?,
            Event::Key(key) => self.handle_key(key)?,
            Event::Error(message) => warn!("Terminal event error: {message}"),
        }
        Ok(())
    }

    fn handle_messages(&mut self, tui: &mut Tui) -> Result<()> {
        while let Ok(message) = self.app_rx.try_recv() {
            match message {
                AppMessage::Render => self.render(tui)?,
                AppMessage::Resize(width, height) => {
                    tui.resize(Rect::new(0, 0, width, height))?;
                    self.render(tui)?;
                }
                other => self.handle_message(other),
            }
        }
        Ok(())
    }

    /// Apply a message that does not need the terminal.
    fn handle_message(&mut self, message: AppMessage) {
        if !matches!(message, AppMessage::Tick) {
            debug!("Handling message: {message:?}");
        }

        match message {
            AppMessage::Tick => {
                if let Some(top) = self.stack.last_mut() {
                    top.screen().handle_tick();
                }
                self.toasts.handle_tick();
            }
            AppMessage::Quit => self.should_quit = true,
            AppMessage::Suspend => self.should_suspend = true,
            AppMessage::Resume => self.should_suspend = false,
            AppMessage::PermissionPrompt(reply) => {
                let dialog = ConfirmDialog::new(
                    "Allow nearby to use your location to show services around you?",
                    self.resolver.clone(),
                )
                .with_title("Location permission")
                .with_confirm_text("Allow")
                .with_cancel_text("Don't allow");
                // A prompt still open is superseded; its request reads as denied.
                self.permission = Some(PendingPermission { dialog, reply });
            }
            AppMessage::Location { ticket, state } => self.route_location(ticket, state),
            AppMessage::ShowToast {
                message,
                toast_type,
            } => self.toasts.show(Toast::new(message, toast_type)),
            AppMessage::DisplayError(message) => {
                self.error = Some(ErrorDialog::new(message, self.resolver.clone()));
            }
            AppMessage::Render | AppMessage::Resize(..) => {}
        }
    }

    fn route_location(&mut self, ticket: LocationTicket, state: LocationState) {
        let on_top = self.stack.last().is_some_and(|top| top.id == ticket.screen);
        let listing = self.stack.iter_mut().find_map(|mounted| match &mut mounted.route {
            Route::Listing(listing) if mounted.id == ticket.screen => Some(listing),
            _ => None,
        });
        match listing {
            Some(listing) => {
                let fixed = matches!(state, LocationState::Available(_));
                // Only the visible screen announces its fix.
                if listing.apply_location(ticket.request, state) && fixed && on_top {
                    self.toasts
                        .show(Toast::new("Location updated", ToastType::Info));
                }
            }
            None => debug!(
                "Dropping location update for unmounted screen {:?}",
                ticket.screen
            ),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if let Some(pending) = &mut self.permission {
            let answer = match pending.dialog.handle_key(key)? {
                EventResult::Event(ConfirmEvent::Confirmed) => Permission::Granted,
                EventResult::Event(ConfirmEvent::Cancelled) => Permission::Denied,
                EventResult::Consumed | EventResult::Ignored => return Ok(()),
            };
            if let Some(pending) = self.permission.take()
                && pending.reply.send(answer).is_err()
            {
                debug!("Permission answered after its request was dropped");
            }
            return Ok(());
        }

        if let Some(dialog) = &mut self.error {
            if let EventResult::Event(ErrorDialogEvent::Dismissed) = dialog.handle_key(key)? {
                self.error = None;
            }
            return Ok(());
        }

        let Some(top) = self.stack.last_mut() else {
            return Ok(());
        };
        let id = top.id;
        match top.screen().handle_key(key)? {
            EventResult::Event(msg) => {
                self.handle_screen_msg(id, msg);
                return Ok(());
            }
            EventResult::Consumed => return Ok(()),
            EventResult::Ignored => {}
        }

        if self.resolver.matches_global(&key, GlobalAction::Quit) {
            self.should_quit = true;
        } else if self.resolver.matches_global(&key, GlobalAction::Back) && self.stack.len() > 1 {
            self.stack.pop();
            debug!("Navigated back, {} screen(s) mounted", self.stack.len());
        }
        Ok(())
    }

    fn handle_screen_msg(&mut self, from: ScreenId, msg: ScreenMsg) {
        match msg {
            ScreenMsg::OpenBooking(record) => {
                if record.is_none() {
                    warn!("Opening booking without a service");
                }
                let id = self.allocate_id();
                let booking = BookingScreen::new(record, self.resolver.clone());
                self.stack.push(Mounted {
                    id,
                    route: Route::Booking(booking),
                });
            }
            ScreenMsg::RequestLocation { request } => {
                let ticket = LocationTicket {
                    screen: from,
                    request,
                };
                self.spawn(Box::new(RequestLocationCmd::new(
                    self.provider.clone(),
                    ticket,
                )));
            }
            ScreenMsg::Run(command) => self.spawn(command),
        }
    }

    fn spawn(&self, command: Box<dyn Command>) {
        let name = command.name();
        let app_tx = self.app_tx.clone();
        debug!("Spawning command: {name}");
        tokio::spawn(async move {
            if let Err(err) = command.execute(app_tx.clone()).await {
                error!("{name} failed: {err:?}");
                let _ = app_tx.send(AppMessage::DisplayError(format!("{name} failed: {err}")));
            }
        });
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        tui.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let theme = self.theme;
        let [main_area, status_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(StatusBar::height())])
            .areas(frame.area());

        if let Some(top) = self.stack.last_mut() {
            top.screen().render(frame, main_area, &theme);
            let screen = top.screen_ref();
            self.status_bar.render(
                frame,
                status_area,
                &theme,
                &screen.breadcrumbs(),
                &screen.keybindings(),
            );
        }

        if let Some(dialog) = &mut self.error {
            dialog.render(frame, main_area, &theme);
        }
        if let Some(pending) = &mut self.permission {
            pending.dialog.render(frame, main_area, &theme);
        }
        if !self.toasts.is_empty() {
            self.toasts.render(frame, main_area, &theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyModifiers};
    use tokio::sync::mpsc;

    use super::*;
    use crate::location::{Accuracy, ConfiguredPosition, FixedPermission, Platform, PromptPermission};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(
        permission: impl FnOnce(&UnboundedSender<AppMessage>) -> Arc<dyn crate::location::PermissionApi>,
    ) -> App {
        let (tx, rx) = mpsc::unbounded_channel();
        let provider = LocationProvider::new(
            Platform::MapCapable,
            permission(&tx),
            Arc::new(ConfiguredPosition::new(REFERENCE_POINT, Accuracy::High)),
            Duration::from_secs(1),
        );
        App::new(
            Launch {
                filters: FilterDefaults::default(),
                request_location: false,
            },
            Arc::new(provider),
            Arc::new(KeyResolver::default()),
            Theme::default(),
            (tx, rx),
        )
    }

    fn app() -> App {
        app_with(|_| Arc::new(FixedPermission(Permission::Granted)))
    }

    fn root_listing(app: &App) -> &ListingScreen {
        match &app.stack[0].route {
            Route::Listing(listing) => listing,
            Route::Booking(_) => panic!("root is always the listing"),
        }
    }

    /// Apply queued messages until `done` holds.
    async fn pump_until(app: &mut App, done: impl Fn(&App) -> bool) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while !done(app) {
                if let Some(message) = app.app_rx.recv().await {
                    app.handle_message(message);
                }
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_confirm_pushes_booking_and_back_pops_it() {
        let mut app = app();
        app.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(app.stack.len(), 1);

        app.handle_key(press(KeyCode::Char('y'))).unwrap();
        assert_eq!(app.stack.len(), 2);
        assert_eq!(
            app.stack[1].screen_ref().breadcrumbs(),
            vec!["Services".to_string(), "Encanador Domicílio".to_string()]
        );

        app.handle_key(press(KeyCode::Esc)).unwrap();
        assert_eq!(app.stack.len(), 1);

        // Back on the root screen is a no-op.
        app.handle_key(press(KeyCode::Esc)).unwrap();
        assert_eq!(app.stack.len(), 1);
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_quit_key() {
        let mut app = app();
        app.handle_key(press(KeyCode::Char('q'))).unwrap();
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_refresh_walks_to_available() {
        let mut app = app();
        app.handle_key(press(KeyCode::Char('r'))).unwrap();
        pump_until(&mut app, |app| {
            matches!(root_listing(app).location(), LocationState::Available(_))
        })
        .await;
        let fix = root_listing(&app).location().fix().cloned().unwrap();
        assert_eq!(fix.coordinate, REFERENCE_POINT);
        assert!(!app.toasts.is_empty());
    }

    #[tokio::test]
    async fn test_fix_settling_under_booking_updates_listing_quietly() {
        let mut app = app();
        app.handle_key(press(KeyCode::Char('r'))).unwrap();
        pump_until(&mut app, |app| {
            matches!(root_listing(app).location(), LocationState::Fetching)
        })
        .await;

        app.handle_key(press(KeyCode::Enter)).unwrap();
        app.handle_key(press(KeyCode::Char('y'))).unwrap();
        assert_eq!(app.stack.len(), 2);

        pump_until(&mut app, |app| root_listing(app).location().fix().is_some()).await;
        assert!(app.toasts.is_empty());

        app.handle_key(press(KeyCode::Esc)).unwrap();
        assert_eq!(app.stack.len(), 1);
        assert!(root_listing(&app).location().fix().is_some());
    }

    #[tokio::test]
    async fn test_permission_prompt_denial() {
        let mut app = app_with(|tx| Arc::new(PromptPermission::new(tx.clone())));
        app.handle_key(press(KeyCode::Char('r'))).unwrap();
        pump_until(&mut app, |app| app.permission.is_some()).await;
        assert_eq!(root_listing(&app).location(), &LocationState::PermissionPending);

        // Screen keys are blocked while the prompt is open.
        app.handle_key(press(KeyCode::Char('c'))).unwrap();
        assert_eq!(
            root_listing(&app).criteria().category,
            crate::catalog::Category::AtHome
        );

        app.handle_key(press(KeyCode::Char('n'))).unwrap();
        assert!(app.permission.is_none());
        pump_until(&mut app, |app| {
            !root_listing(app).location().is_pending()
        })
        .await;
        assert_eq!(
            root_listing(&app).location(),
            &LocationState::Error(crate::location::LocationError::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn test_location_for_unknown_screen_is_dropped() {
        let mut app = app();
        let _ = app.handle_key(press(KeyCode::Char('r')));
        app.handle_message(AppMessage::Location {
            ticket: LocationTicket {
                screen: ScreenId(99),
                request: 1,
            },
            state: LocationState::Fetching,
        });
        // The root only sees its own request's updates.
        assert_ne!(root_listing(&app).location(), &LocationState::Fetching);
    }

    #[tokio::test]
    async fn test_error_dialog_blocks_until_dismissed() {
        let mut app = app();
        app.handle_message(AppMessage::DisplayError("clipboard unavailable".to_string()));
        app.handle_key(press(KeyCode::Char('c'))).unwrap();
        assert_eq!(
            root_listing(&app).criteria().category,
            crate::catalog::Category::AtHome
        );
        app.handle_key(press(KeyCode::Esc)).unwrap();
        assert!(app.error.is_none());
        app.handle_key(press(KeyCode::Char('c'))).unwrap();
        assert_eq!(
            root_listing(&app).criteria().category,
            crate::catalog::Category::Sidewalk
        );
    }
}
