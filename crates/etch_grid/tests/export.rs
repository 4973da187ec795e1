use etch_grid::{
    export_grid, CellGrid, CellIndex, EtchConfig, EtchError, GridGeometry, Rgb, SketchEvent,
    SketchSession, Viewport,
};

const A: Rgb = Rgb::new(255, 0, 0);
const B: Rgb = Rgb::new(0, 255, 0);
const C: Rgb = Rgb::new(0, 0, 255);
const D: Rgb = Rgb::new(10, 20, 30);

fn quad() -> CellGrid {
    let mut grid = CellGrid::blank(2);
    for (index, color) in [A, B, C, D].into_iter().enumerate() {
        grid.set(CellIndex(index), color);
    }
    grid
}

#[test]
fn fractional_geometry_exports_truncated_blocks() {
    let geometry = GridGeometry::new(2.7, 1.2, 2, 35.0).unwrap();
    let image = export_grid(&quad(), &geometry).unwrap();

    assert_eq!((image.width(), image.height()), (4, 2));
    assert_eq!(image.pixels(), &[A, A, B, B, C, C, D, D]);
    assert_eq!(
        image.to_text(),
        "P3\n4 2\n255\n\
         255 0 0\n255 0 0\n0 255 0\n0 255 0\n\
         0 0 255\n0 0 255\n10 20 30\n10 20 30\n"
    );
}

#[test]
fn unpainted_cells_export_white() {
    let geometry = GridGeometry::new(1.0, 1.0, 1, 0.0).unwrap();
    let image = export_grid(&CellGrid::blank(1), &geometry).unwrap();
    assert_eq!(image.to_text(), "P3\n1 1\n255\n255 255 255\n");
}

#[test]
fn stale_geometry_is_rejected() {
    let geometry = GridGeometry::new(4.0, 4.0, 3, 0.0).unwrap();
    assert!(matches!(
        export_grid(&quad(), &geometry),
        Err(EtchError::StaleGeometry { geometry: 3, grid: 2 })
    ));
}

#[test]
fn sub_pixel_cells_cannot_export() {
    let geometry = GridGeometry::new(0.5, 3.0, 2, 0.0).unwrap();
    assert!(matches!(export_grid(&quad(), &geometry), Err(EtchError::EmptyImage)));
}

#[test]
fn oversized_geometry_is_an_error() {
    let geometry = GridGeometry::new(1e10, 1e10, 100, 0.0).unwrap();
    assert!(matches!(
        export_grid(&CellGrid::blank(100), &geometry),
        Err(EtchError::ImageTooLarge)
    ));

    let geometry = GridGeometry::new(1e4, 1e4, 100, 0.0).unwrap();
    assert!(matches!(
        export_grid(&CellGrid::blank(100), &geometry),
        Err(EtchError::ImageTooLarge)
    ));
}

#[test]
fn replayed_script_exports_exact_text() {
    let config = EtchConfig { default_dimension: 2, seed: Some(3), ..EtchConfig::default() };
    // 2x2 grid of 1px cells under a 6px header.
    let mut session = SketchSession::new(&config, Viewport::new(2.0, 8.0, vec![6.0])).unwrap();

    let script = r##"
        {"type":"control","control":"pen-color","color":"#0a141e"}
        {"type":"pointer-down","x":0.5,"y":6.5}
        {"type":"pointer-move","x":1.5,"y":7.5}
        {"type":"pointer-up"}
        {"type":"pointer-move","x":0.5,"y":7.5}
        {"type":"control","control":"background","color":"rgb(1, 2, 3)"}
    "##;
    for line in script.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let event: SketchEvent = serde_json::from_str(line).unwrap();
        session.handle(event).unwrap();
    }

    let image = session.export().unwrap();
    assert_eq!(image.to_text(), "P3\n2 2\n255\n10 20 30\n1 2 3\n1 2 3\n10 20 30\n");
}
