//! Map overlay for the listing screen.
//!
//! A [`MapView`] is built from the filtered records and the current fix, then
//! drawn on a ratatui canvas. Hosts without map support get a static
//! placeholder panel instead.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Points};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::Theme;
use crate::catalog::{Category, Coordinate, ServiceRecord};
use crate::filter::Radius;

const METERS_PER_DEGREE: f64 = 111_320.0;

/// Marker color, one per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinColor {
    Blue,
    Orange,
}

impl From<Category> for PinColor {
    fn from(category: Category) -> Self {
        match category {
            Category::AtHome => Self::Blue,
            Category::Sidewalk => Self::Orange,
        }
    }
}

impl PinColor {
    const fn color(self, theme: &Theme) -> Color {
        match self {
            Self::Blue => theme.blue(),
            Self::Orange => theme.peach(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub label: String,
    pub coordinate: Coordinate,
    pub color: PinColor,
}

/// Visible region: a center and the half-width of the square around it, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub center: Coordinate,
    pub extent: f64,
}

impl MapViewport {
    /// A viewport wide enough to show everything within `radius` of `center`.
    pub fn covering(center: Coordinate, radius: Radius) -> Self {
        Self {
            center,
            extent: f64::from(radius.threshold_meters()) / METERS_PER_DEGREE,
        }
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        [
            self.center.longitude - self.extent,
            self.center.longitude + self.extent,
        ]
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        [
            self.center.latitude - self.extent,
            self.center.latitude + self.extent,
        ]
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        let [west, east] = self.x_bounds();
        let [south, north] = self.y_bounds();
        (west..=east).contains(&coordinate.longitude) && (south..=north).contains(&coordinate.latitude)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub viewport: MapViewport,
    pub pins: Vec<Pin>,
    pub user: Option<Coordinate>,
}

impl MapView {
    /// Build the map for the given records.
    ///
    /// Centers on `user` when a fix is known, otherwise on `fallback_center`.
    /// Records without a coordinate get no pin.
    pub fn new(
        records: &[ServiceRecord],
        radius: Radius,
        user: Option<Coordinate>,
        fallback_center: Coordinate,
    ) -> Self {
        let pins = records
            .iter()
            .filter_map(|record| {
                record.coordinate.map(|coordinate| Pin {
                    label: record.name.clone(),
                    coordinate,
                    color: record.category.into(),
                })
            })
            .collect();

        Self {
            viewport: MapViewport::covering(user.unwrap_or(fallback_center), radius),
            pins,
            user,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .title(" Map ")
            .title_style(Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.surface1()));

        let text_color = theme.subtext1();
        let user_color = theme.yellow();

        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds(self.viewport.x_bounds())
            .y_bounds(self.viewport.y_bounds())
            .paint(|ctx| {
                if let Some(user) = self.user {
                    ctx.draw(&Circle {
                        x: user.longitude,
                        y: user.latitude,
                        radius: self.viewport.extent / 20.0,
                        color: user_color,
                    });
                }
                for pin in self.pins.iter().filter(|p| self.viewport.contains(p.coordinate)) {
                    let color = pin.color.color(theme);
                    ctx.draw(&Points {
                        coords: &[(pin.coordinate.longitude, pin.coordinate.latitude)],
                        color,
                    });
                    ctx.print(
                        pin.coordinate.longitude,
                        pin.coordinate.latitude,
                        Line::from(Span::styled(
                            format!(" {}", pin.label),
                            Style::default().fg(text_color),
                        )),
                    );
                }
            });

        frame.render_widget(canvas, area);
    }
}

/// Panel shown where the map would be on hosts without map support.
pub fn render_placeholder(frame: &mut Frame, area: Rect, theme: &Theme) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Map unavailable on this platform",
            Style::default().fg(theme.overlay1()).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Distances are listed next to each service.",
            Style::default().fg(theme.overlay0()),
        )),
    ];

    let block = Block::default()
        .title(" Map ")
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.surface1()));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{REFERENCE_POINT, catalog};

    #[test]
    fn test_one_pin_per_located_record() {
        let mut records = catalog()[..3].to_vec();
        records.push(ServiceRecord::new(
            "x",
            "Sem endereço",
            Category::AtHome,
            "sem coordenada",
            10,
            100,
        ));

        let map = MapView::new(&records, Radius::OneKm, None, REFERENCE_POINT);
        assert_eq!(map.pins.len(), 3);
        assert_eq!(map.pins[0].label, "Encanador Domicílio");
        assert_eq!(map.pins[0].color, PinColor::Blue);
        assert_eq!(map.pins[1].color, PinColor::Orange);
    }

    #[test]
    fn test_centers_on_fix_when_known() {
        let user = Coordinate::new(-23.59, -46.65);
        let map = MapView::new(catalog(), Radius::OneKm, Some(user), REFERENCE_POINT);
        assert_eq!(map.viewport.center, user);

        let map = MapView::new(catalog(), Radius::OneKm, None, REFERENCE_POINT);
        assert_eq!(map.viewport.center, REFERENCE_POINT);
    }

    #[test]
    fn test_extent_grows_with_radius() {
        let near = MapViewport::covering(REFERENCE_POINT, Radius::OneKm);
        let far = MapViewport::covering(REFERENCE_POINT, Radius::FiveKm);
        assert!(far.extent > near.extent);
        assert!(catalog()
            .iter()
            .filter_map(|r| r.coordinate)
            .all(|c| near.contains(c)));
    }
}
