use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, ListItem, Paragraph, Wrap};
use tracing::debug;

use crate::Theme;
use crate::catalog::{Category, Coordinate, ServiceRecord, catalog};
use crate::config::{KeyResolver, ListingAction, NavAction};
use crate::filter::{FilterCriteria, Radius, filter};
use crate::location::{LocationError, LocationState, Platform};
use crate::map::{self, MapView};
use crate::screen::ScreenMsg;
use crate::ui::{
    Component, ConfirmDialog, ConfirmEvent, EventResult, Keybinding, List, ListEvent, ListRow,
    Result, Screen, Spinner, TextInput, TextInputEvent,
};

const EMPTY_RESULTS: &str = "No services found. Try adjusting the filters!";

#[derive(Clone)]
struct ServiceRow(ServiceRecord);

impl ListRow for ServiceRow {
    fn render_row(&self, theme: &Theme) -> ListItem<'static> {
        let record = &self.0;
        ListItem::new(vec![
            Line::from(Span::styled(
                record.name.clone(),
                Style::default().fg(theme.text()).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                record.description.clone(),
                Style::default().fg(theme.subtext0()),
            )),
            Line::from(Span::styled(
                format!("R$ {} - {}m away", record.price, record.distance_meters),
                Style::default().fg(theme.overlay1()),
            )),
            Line::from(""),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Results,
    Neighborhood,
    Radius,
}

/// A booking awaiting the user's yes/no.
struct PendingBooking {
    dialog: ConfirmDialog,
    record: ServiceRecord,
}

/// Filterable list of services with the location panel and map overlay.
pub struct ListingScreen {
    services: Arc<[ServiceRecord]>,
    criteria: FilterCriteria,
    neighborhood: TextInput,
    radius: TextInput,
    focus: Focus,
    results: List<ServiceRow>,
    location: LocationState,
    latest_request: u64,
    spinner: Spinner,
    platform: Platform,
    reference: Coordinate,
    show_map: bool,
    pending: Option<PendingBooking>,
    resolver: Arc<KeyResolver>,
}

impl ListingScreen {
    /// `radius_text` is the raw radius field content, parsed the same way as user input.
    pub fn new(
        neighborhood_text: &str,
        radius_text: &str,
        category: Category,
        platform: Platform,
        reference: Coordinate,
        resolver: Arc<KeyResolver>,
    ) -> Self {
        let criteria = FilterCriteria {
            neighborhood_text: neighborhood_text.to_string(),
            radius: Radius::from_input(radius_text),
            category,
        };
        let services: Arc<[ServiceRecord]> = Arc::from(catalog());
        let results = List::new(Self::rows_for(&services, &criteria), resolver.clone());

        Self {
            services,
            criteria,
            neighborhood: TextInput::new("Neighborhood")
                .with_value(neighborhood_text)
                .with_placeholder("Type a neighborhood (e.g. Moema)"),
            radius: TextInput::new("Radius")
                .with_value(radius_text)
                .with_placeholder("1km / 2km / 5km"),
            focus: Focus::Results,
            results,
            location: LocationState::Unrequested,
            latest_request: 0,
            spinner: Spinner::new(),
            platform,
            reference,
            show_map: true,
            pending: None,
            resolver,
        }
    }

    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub const fn location(&self) -> &LocationState {
        &self.location
    }

    pub fn visible_records(&self) -> Vec<&ServiceRecord> {
        self.results.items().iter().map(|row| &row.0).collect()
    }

    /// Start a new location request, superseding any in flight.
    pub fn begin_location_request(&mut self) -> ScreenMsg {
        self.latest_request += 1;
        ScreenMsg::RequestLocation {
            request: self.latest_request,
        }
    }

    /// Apply a location update. Results of superseded requests are dropped.
    pub fn apply_location(&mut self, request: u64, state: LocationState) -> bool {
        if request != self.latest_request {
            debug!(
                "Discarding location update for stale request {request} (latest {})",
                self.latest_request
            );
            return false;
        }
        match &state {
            LocationState::PermissionPending => self.spinner.set_label("Waiting for permission..."),
            LocationState::Fetching => self.spinner.set_label("Locating device..."),
            _ => {}
        }
        self.location = state;
        true
    }

    /// Swap the records the screen filters over.
    #[cfg(test)]
    fn with_services(mut self, services: Vec<ServiceRecord>) -> Self {
        self.services = services.into();
        self.refilter();
        self
    }

    fn rows_for(services: &[ServiceRecord], criteria: &FilterCriteria) -> Vec<ServiceRow> {
        filter(services, criteria).into_iter().map(ServiceRow).collect()
    }

    fn refilter(&mut self) {
        let rows = Self::rows_for(&self.services, &self.criteria);
        debug!("Filter {:?} matched {} services", self.criteria, rows.len());
        self.results.set_items(rows);
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.neighborhood.set_focused(focus == Focus::Neighborhood);
        self.radius.set_focused(focus == Focus::Radius);
    }

    fn handle_pending_key(&mut self, key: KeyEvent) -> Result<EventResult<ScreenMsg>> {
        let Some(pending) = &mut self.pending else {
            return Ok(EventResult::Ignored);
        };
        match pending.dialog.handle_key(key)? {
            EventResult::Event(ConfirmEvent::Confirmed) => {
                let record = self.pending.take().map(|p| p.record);
                Ok(ScreenMsg::OpenBooking(record).into())
            }
            EventResult::Event(ConfirmEvent::Cancelled) => {
                self.pending = None;
                Ok(EventResult::Consumed)
            }
            EventResult::Consumed | EventResult::Ignored => Ok(EventResult::Consumed),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Result<EventResult<ScreenMsg>> {
        let field = match self.focus {
            Focus::Neighborhood => &mut self.neighborhood,
            Focus::Radius => &mut self.radius,
            Focus::Results => return Ok(EventResult::Ignored),
        };
        match field.handle_key(key)? {
            EventResult::Event(TextInputEvent::Changed(_)) => {
                self.criteria.neighborhood_text = self.neighborhood.value().to_string();
                self.criteria.radius = Radius::from_input(self.radius.value());
                self.refilter();
            }
            EventResult::Event(TextInputEvent::Submitted(_) | TextInputEvent::Cancelled) => {
                self.set_focus(Focus::Results);
            }
            EventResult::Consumed | EventResult::Ignored => {}
        }
        Ok(EventResult::Consumed)
    }

    fn open_confirmation(&mut self, record: ServiceRecord) {
        let dialog = ConfirmDialog::new(
            format!("Book {} for R${}?", record.name, record.price),
            self.resolver.clone(),
        )
        .with_title("Book")
        .with_cancel_text("Cancel");
        debug!("Asking: {}", dialog.message());
        self.pending = Some(PendingBooking { dialog, record });
    }

    fn render_filters(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [text_area, radius_area, category_area] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(20),
                Constraint::Length(18),
                Constraint::Length(26),
            ])
            .areas(area);

        self.neighborhood.render(frame, text_area, theme);
        self.radius.render(frame, radius_area, theme);

        let option = |category: Category| {
            let style = if self.criteria.category == category {
                Style::default()
                    .fg(theme.base())
                    .bg(theme.green())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.overlay1())
            };
            Span::styled(format!(" {} ", category.display_name()), style)
        };
        let toggle = Paragraph::new(Line::from(vec![
            option(Category::AtHome),
            Span::raw(" "),
            option(Category::Sidewalk),
        ]))
        .block(
            Block::default()
                .title(" Category ")
                .title_style(Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD))
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.surface1())),
        );
        frame.render_widget(toggle, category_area);
    }

    fn render_location(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if self.location.is_pending() {
            self.spinner.render(frame, area, theme);
            return;
        }
        let color = match &self.location {
            LocationState::Available(_) => theme.green(),
            LocationState::Error(LocationError::UnsupportedPlatform) => theme.overlay1(),
            LocationState::Error(_) => theme.red(),
            _ => theme.subtext0(),
        };
        let text = location_summary(&self.location, &self.resolver);
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(color))),
            area,
        );
    }

    fn render_results(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .title(format!(" Services ({}) ", self.results.items().len()))
            .title_style(Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(if self.focus == Focus::Results {
                theme.lavender()
            } else {
                theme.surface1()
            }));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.results.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(EMPTY_RESULTS, Style::default().fg(theme.overlay1()))),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
            frame.render_widget(empty, inner);
        } else {
            self.results.render(frame, inner, theme);
        }
    }

    fn render_map(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if !self.platform.supports_map() {
            map::render_placeholder(frame, area, theme);
            return;
        }
        let records: Vec<ServiceRecord> = self.visible_records().into_iter().cloned().collect();
        let user = self.location.fix().map(|fix| fix.coordinate);
        MapView::new(&records, self.criteria.radius, user, self.reference).render(frame, area, theme);
    }
}

/// One-line description of the location state for the status line.
fn location_summary(state: &LocationState, resolver: &KeyResolver) -> String {
    let refresh = resolver.display_listing(ListingAction::RefreshLocation);
    match state {
        LocationState::Unrequested => format!("Location not requested, press {refresh} to locate"),
        LocationState::PermissionPending => "Waiting for location permission...".to_string(),
        LocationState::Fetching => "Locating device...".to_string(),
        LocationState::Available(fix) => format!(
            "You are at {} ({} accuracy, {})",
            fix.coordinate,
            fix.accuracy,
            fix.obtained_at.format("%H:%M:%S")
        ),
        LocationState::Error(LocationError::UnsupportedPlatform) => {
            "Location is not available on this platform".to_string()
        }
        LocationState::Error(error) if error.is_retryable() => {
            format!("Could not get location ({error}), press {refresh} to try again")
        }
        LocationState::Error(error) => format!("Could not get location ({error})"),
    }
}

impl Screen for ListingScreen {
    type Msg = ScreenMsg;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Msg>> {
        if self.pending.is_some() {
            return self.handle_pending_key(key);
        }
        if self.focus != Focus::Results {
            return self.handle_input_key(key);
        }

        if self.resolver.matches_listing(&key, ListingAction::EditNeighborhood) {
            self.set_focus(Focus::Neighborhood);
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_listing(&key, ListingAction::EditRadius) {
            self.set_focus(Focus::Radius);
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_listing(&key, ListingAction::ToggleCategory) {
            self.criteria.toggle_category();
            self.refilter();
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_listing(&key, ListingAction::RefreshLocation) {
            let settled = matches!(&self.location, LocationState::Error(e) if !e.is_retryable());
            if self.location.is_pending() || settled {
                return Ok(EventResult::Consumed);
            }
            return Ok(self.begin_location_request().into());
        }
        if self.resolver.matches_listing(&key, ListingAction::ToggleMap) {
            self.show_map = !self.show_map;
            return Ok(EventResult::Consumed);
        }

        Ok(match self.results.handle_key(key)? {
            EventResult::Event(ListEvent::Activated(row)) => {
                self.open_confirmation(row.0);
                EventResult::Consumed
            }
            EventResult::Event(ListEvent::Changed(_)) | EventResult::Consumed => {
                EventResult::Consumed
            }
            EventResult::Ignored => EventResult::Ignored,
        })
    }

    fn handle_tick(&mut self) {
        if self.location.is_pending() {
            self.spinner.handle_tick();
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [title_area, filter_area, location_area, body_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(5),
            ])
            .areas(area);

        frame.render_widget(
            Paragraph::new(Span::styled(
                "Agendador SP - Local services",
                Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            title_area,
        );
        self.render_filters(frame, filter_area, theme);
        self.render_location(frame, location_area, theme);

        if self.show_map {
            let [list_area, map_area] = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(body_area);
            self.render_results(frame, list_area, theme);
            self.render_map(frame, map_area, theme);
        } else {
            self.render_results(frame, body_area, theme);
        }

        if let Some(pending) = &mut self.pending {
            pending.dialog.render(frame, area, theme);
        }
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec!["Services".to_string()]
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        if self.pending.is_some() {
            return vec![
                Keybinding::new("y", "Confirm"),
                Keybinding::new("n", "Cancel"),
            ];
        }
        if self.focus != Focus::Results {
            return vec![
                Keybinding::new("Enter/Esc", "Done"),
                Keybinding::new("ctrl+u", "Clear"),
            ];
        }
        vec![
            Keybinding::new(r.display_nav(NavAction::Select), "Book"),
            Keybinding::new(r.display_listing(ListingAction::EditNeighborhood), "Neighborhood"),
            Keybinding::new(r.display_listing(ListingAction::EditRadius), "Radius"),
            Keybinding::new(r.display_listing(ListingAction::ToggleCategory), "Category"),
            Keybinding::new(r.display_listing(ListingAction::RefreshLocation), "Locate"),
            Keybinding::new(r.display_listing(ListingAction::ToggleMap), "Map"),
        ]
    }
}
