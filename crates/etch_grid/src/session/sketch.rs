use log::{debug, trace};

use crate::config::EtchConfig;
use crate::layout::dimension::DimensionPolicy;
use crate::layout::geometry::{GridGeometry, Viewport};
use crate::layout::slider::Slider;
use crate::paint::canvas::CellGrid;
use crate::paint::color::Rgb;
use crate::paint::painter::Painter;
use crate::raster::ppm::PixelImage;
use crate::{export_grid, EtchError};

use super::events::{ControlChange, ResizeRequest, SketchEvent};

/// Caller-owned sketch state: one canvas, the geometry it was laid out with,
/// and the pen that paints it.
#[derive(Debug)]
pub struct SketchSession {
    policy: DimensionPolicy,
    painter: Painter,
    viewport: Viewport,
    grid: CellGrid,
    geometry: GridGeometry,
    stroking: bool,
}

impl SketchSession {
    pub fn new(config: &EtchConfig, viewport: Viewport) -> Result<Self, EtchError> {
        let policy = config.dimension_policy()?;
        let painter = config.painter();
        let dimension = policy.default_dimension();
        let geometry = viewport.geometry(dimension)?;
        let grid = CellGrid::filled(dimension, painter.background());

        Ok(Self { policy, painter, viewport, grid, geometry, stroking: false })
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn painter(&self) -> &Painter {
        &self.painter
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn dimension(&self) -> u16 {
        self.grid.dimension()
    }

    pub fn is_stroking(&self) -> bool {
        self.stroking
    }

    /// Resize slider spanning the viewport, one button per accepted side length.
    pub fn slider(&self) -> Slider {
        Slider::spanning(self.viewport.width, self.policy.max() + 1)
    }

    pub fn handle(&mut self, event: SketchEvent) -> Result<(), EtchError> {
        trace!("handling {event:?}");

        match event {
            SketchEvent::PointerDown { x, y, button } => {
                // Strokes only start on the board.
                if button == 0 {
                    self.stroking = self.paint_at(x, y);
                }
            },
            SketchEvent::PointerMove { x, y, buttons } => {
                if !self.stroking {
                    return Ok(());
                }
                if buttons == 0 {
                    self.stroking = false;
                } else {
                    self.paint_at(x, y);
                }
            },
            SketchEvent::PointerUp => self.stroking = false,
            SketchEvent::TouchStart { x, y } | SketchEvent::TouchMove { x, y } => {
                self.paint_at(x, y);
            },
            SketchEvent::TouchEnd => (),
            SketchEvent::Control(change) => self.control(change)?,
            SketchEvent::OrientationChange { width, height } => {
                let viewport = Viewport { width, height, ..self.viewport.clone() };
                self.relayout(viewport, self.policy.default_dimension())?;
            },
        }

        Ok(())
    }

    /// Rasterize the canvas as it is right now.
    pub fn export(&self) -> Result<PixelImage, EtchError> {
        export_grid(&self.grid, &self.geometry)
    }

    /// Replace canvas and geometry together; neither survives a rebuild alone.
    pub fn rebuild(&mut self, dimension: u16) -> Result<(), EtchError> {
        self.relayout(self.viewport.clone(), dimension)
    }

    /// Nothing changes unless the new viewport can hold the grid.
    fn relayout(&mut self, viewport: Viewport, dimension: u16) -> Result<(), EtchError> {
        let dimension = self.policy.normalize(i64::from(dimension));
        let geometry = viewport.geometry(dimension)?;

        self.viewport = viewport;
        self.grid = CellGrid::filled(dimension, self.painter.background());
        self.geometry = geometry;
        self.stroking = false;

        debug!(
            "rebuilt {dimension}x{dimension} grid, cells {:.2}x{:.2}px at offset {:.1}px",
            geometry.cell_width, geometry.cell_height, geometry.vertical_offset
        );
        Ok(())
    }

    fn control(&mut self, change: ControlChange) -> Result<(), EtchError> {
        match change {
            ControlChange::Resize { dimension } => {
                let dimension = match dimension {
                    ResizeRequest::Exact(requested) => self.policy.normalize(requested),
                    ResizeRequest::Text(input) => self.policy.parse(&input),
                };
                self.rebuild(dimension)?;
            },
            ControlChange::Slider { x } => match self.slider().button_at(x) {
                Some(position) => self.rebuild(position)?,
                None => trace!("slider release at {x} outside the buttons"),
            },
            ControlChange::PenColor { color } => {
                let color: Rgb = color.parse()?;
                self.painter.set_custom_foreground(color);
            },
            ControlChange::Background { color } => {
                let color: Rgb = color.parse()?;
                let previous = self.painter.set_background(color);
                let replaced = self.grid.replace_background(previous, color);
                debug!("background {previous} -> {color}, {replaced} cells recolored");
            },
            ControlChange::ClearAll => self.grid.clear_all(self.painter.background()),
            ControlChange::UseBackground => {
                self.painter.reset_mode();
                self.painter.use_background();
            },
            ControlChange::UseCustom => {
                self.painter.reset_mode();
                self.painter.use_custom_foreground();
            },
            ControlChange::LuckyPick => {
                self.painter.reset_mode();
                let color = self.painter.lucky_pick();
                debug!("lucky pick {}", color.to_hex());
            },
            ControlChange::Psychedelic => {
                self.painter.reset_mode();
                self.painter.psychedelic();
            },
            ControlChange::Lighten => {
                self.painter.reset_mode();
                self.painter.lighten_mode();
            },
            ControlChange::Darken => {
                self.painter.reset_mode();
                self.painter.darken_mode();
            },
        }

        Ok(())
    }

    /// Returns whether a cell was under the pointer.
    fn paint_at(&mut self, x: f32, y: f32) -> bool {
        match self.geometry.resolve(x, y) {
            Some(cell) => {
                self.painter.paint(&mut self.grid, cell);
                true
            },
            None => {
                trace!("({x}, {y}) is outside the grid");
                false
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::CellIndex;

    fn session() -> SketchSession {
        let config = EtchConfig { default_dimension: 4, seed: Some(1), ..EtchConfig::default() };
        // 400px square grid below a 100px header: 100px cells.
        SketchSession::new(&config, Viewport::new(400.0, 500.0, vec![100.0])).unwrap()
    }

    fn painted(session: &SketchSession) -> Vec<usize> {
        session
            .grid()
            .logical_colors()
            .iter()
            .enumerate()
            .filter(|(_, color)| **color == Rgb::BLACK)
            .map(|(index, _)| index)
            .collect()
    }

    #[test]
    fn starts_with_background_filled_default_grid() {
        let session = session();
        assert_eq!(session.dimension(), 4);
        assert_eq!(session.geometry().cell_width, 100.0);
        assert!(session.grid().logical_colors().iter().all(|&color| color == Rgb::WHITE));
    }

    #[test]
    fn stroke_paints_until_buttons_release() {
        let mut session = session();
        session.handle(SketchEvent::PointerDown { x: 50.0, y: 150.0, button: 0 }).unwrap();
        assert!(session.is_stroking());
        session.handle(SketchEvent::PointerMove { x: 150.0, y: 150.0, buttons: 1 }).unwrap();
        session.handle(SketchEvent::PointerMove { x: 150.0, y: 250.0, buttons: 1 }).unwrap();
        session.handle(SketchEvent::PointerMove { x: 250.0, y: 250.0, buttons: 0 }).unwrap();
        assert!(!session.is_stroking());
        session.handle(SketchEvent::PointerMove { x: 350.0, y: 350.0, buttons: 1 }).unwrap();

        assert_eq!(painted(&session), vec![0, 1, 5]);
    }

    #[test]
    fn press_off_the_board_starts_no_stroke() {
        let mut session = session();
        session.handle(SketchEvent::PointerDown { x: 50.0, y: 50.0, button: 0 }).unwrap();
        assert!(!session.is_stroking());
        session.handle(SketchEvent::PointerMove { x: 150.0, y: 150.0, buttons: 1 }).unwrap();
        assert!(painted(&session).is_empty());
    }

    #[test]
    fn secondary_button_does_not_paint() {
        let mut session = session();
        session.handle(SketchEvent::PointerDown { x: 50.0, y: 150.0, button: 2 }).unwrap();
        session.handle(SketchEvent::PointerMove { x: 150.0, y: 150.0, buttons: 2 }).unwrap();
        assert!(painted(&session).is_empty());
    }

    #[test]
    fn touches_outside_the_board_are_skipped() {
        let mut session = session();
        session.handle(SketchEvent::TouchStart { x: 50.0, y: 50.0 }).unwrap();
        session.handle(SketchEvent::TouchMove { x: -5.0, y: 150.0 }).unwrap();
        session.handle(SketchEvent::TouchMove { x: 450.0, y: 150.0 }).unwrap();
        session.handle(SketchEvent::TouchMove { x: 399.0, y: 499.0 }).unwrap();
        session.handle(SketchEvent::TouchEnd).unwrap();
        assert_eq!(painted(&session), vec![15]);
    }

    #[test]
    fn resize_replaces_grid_and_geometry() {
        let mut session = session();
        session.handle(SketchEvent::TouchStart { x: 50.0, y: 150.0 }).unwrap();

        let resize = |dimension: ResizeRequest| {
            SketchEvent::Control(ControlChange::Resize { dimension })
        };
        session.handle(resize(ResizeRequest::Exact(8))).unwrap();
        assert_eq!(session.dimension(), 8);
        assert_eq!(session.geometry().dimension, 8);
        assert_eq!(session.geometry().cell_width, 50.0);
        assert!(painted(&session).is_empty());

        session.handle(resize(ResizeRequest::Exact(500))).unwrap();
        assert_eq!(session.dimension(), 100);
        session.handle(resize("not a number".into())).unwrap();
        assert_eq!(session.dimension(), 4);
        session.handle(resize(ResizeRequest::Exact(0))).unwrap();
        assert_eq!(session.dimension(), 1);
    }

    #[test]
    fn slider_release_picks_dimension() {
        let mut session = session();
        // 101 buttons across 400px.
        let x = session.slider().button_width * 10.5;
        session.handle(SketchEvent::Control(ControlChange::Slider { x })).unwrap();
        assert_eq!(session.dimension(), 10);
        session.handle(SketchEvent::Control(ControlChange::Slider { x: -1.0 })).unwrap();
        assert_eq!(session.dimension(), 10);
    }

    #[test]
    fn background_change_recolors_only_background_cells() {
        let mut session = session();
        session.handle(SketchEvent::TouchStart { x: 50.0, y: 150.0 }).unwrap();
        let navy = Rgb::new(0, 0, 128);
        session
            .handle(SketchEvent::Control(ControlChange::Background { color: "navy".into() }))
            .unwrap();

        let colors = session.grid().logical_colors();
        assert_eq!(colors[0], Rgb::BLACK);
        assert!(colors[1..].iter().all(|&color| color == navy));

        session.handle(SketchEvent::Control(ControlChange::ClearAll)).unwrap();
        assert!(session.grid().logical_colors().iter().all(|&color| color == navy));
    }

    #[test]
    fn unparseable_picker_color_is_an_error() {
        let mut session = session();
        let event = SketchEvent::Control(ControlChange::PenColor { color: "rgb(1, 2)".into() });
        assert!(matches!(session.handle(event), Err(EtchError::UnparseableColor(_))));
    }

    #[test]
    fn use_background_erases() {
        let mut session = session();
        session.handle(SketchEvent::TouchStart { x: 50.0, y: 150.0 }).unwrap();
        session.handle(SketchEvent::Control(ControlChange::UseBackground)).unwrap();
        session.handle(SketchEvent::TouchStart { x: 50.0, y: 150.0 }).unwrap();
        assert!(painted(&session).is_empty());

        session.handle(SketchEvent::Control(ControlChange::UseCustom)).unwrap();
        session.handle(SketchEvent::TouchStart { x: 50.0, y: 150.0 }).unwrap();
        assert_eq!(painted(&session), vec![0]);
    }

    #[test]
    fn darken_then_pen_selection_resets_mode() {
        let mut session = session();
        session.handle(SketchEvent::Control(ControlChange::Darken)).unwrap();
        session.handle(SketchEvent::TouchStart { x: 50.0, y: 150.0 }).unwrap();
        let darkened = session.painter().darken(Rgb::WHITE);
        assert_ne!(darkened, Rgb::WHITE);
        assert_eq!(session.grid().get(CellIndex(0)), Some(darkened));

        session.handle(SketchEvent::Control(ControlChange::UseCustom)).unwrap();
        session.handle(SketchEvent::TouchStart { x: 50.0, y: 150.0 }).unwrap();
        assert_eq!(session.grid().get(CellIndex(0)), Some(Rgb::BLACK));
    }

    #[test]
    fn orientation_change_relayouts_at_default_dimension() {
        let mut session = session();
        let resize = ControlChange::Resize { dimension: ResizeRequest::Exact(10) };
        session.handle(SketchEvent::Control(resize)).unwrap();
        session.handle(SketchEvent::OrientationChange { width: 200.0, height: 900.0 }).unwrap();
        assert_eq!(session.dimension(), 4);
        assert_eq!(session.geometry().cell_width, 50.0);

        let cramped = SketchEvent::OrientationChange { width: 200.0, height: 80.0 };
        assert!(matches!(session.handle(cramped), Err(EtchError::InvalidGeometry(_))));
        assert_eq!(session.dimension(), 4);
        assert_eq!(session.viewport().height, 900.0);
    }

    #[test]
    fn export_matches_canvas() {
        let mut session = session();
        session.handle(SketchEvent::TouchStart { x: 50.0, y: 150.0 }).unwrap();
        let image = session.export().unwrap();
        assert_eq!((image.width(), image.height()), (400, 400));
        assert_eq!(image.pixel(99, 99), Some(Rgb::BLACK));
        assert_eq!(image.pixel(100, 0), Some(Rgb::WHITE));
        assert_eq!(image.pixel(0, 100), Some(Rgb::WHITE));
    }
}
