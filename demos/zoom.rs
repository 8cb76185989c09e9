use zoomsvg::{Geometry, LatLng, Map, MapOptions, PathOptions, RendererOptions, zoom_svg};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::DEBUG.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let zooms: Vec<f64> = std::env::args()
        .skip(1)
        .map(|arg| arg.parse())
        .collect::<Result<_, _>>()?;

    let options = MapOptions::default()
        .with_center(LatLng::new(48.85, 2.35))
        .with_zoom(10.0);
    let mut map = Map::new(options, zoom_svg(RendererOptions::default()))?;

    map.add_layer(Geometry::Polygon(vec![vec![
        LatLng::new(48.90, 2.25),
        LatLng::new(48.90, 2.42),
        LatLng::new(48.81, 2.42),
        LatLng::new(48.81, 2.25),
    ]]))?;
    map.add_layer_with(
        Geometry::LineString(vec![LatLng::new(48.8566, 2.3522), LatLng::new(48.8049, 2.1204)]),
        PathOptions::default().with_color("#e31a1c").with_dash_array("6 4"),
    )?;
    map.add_layer(Geometry::Point {
        center: LatLng::new(48.8584, 2.2945),
        radius: 8.0,
    })?;

    let zooms = if zooms.is_empty() { vec![11.0, 12.5, 10.0] } else { zooms };
    for zoom in zooms {
        map.set_zoom(zoom)?;
        if let Some(container) = map.renderer().container() {
            println!("<!-- zoom {} -->", zoom);
            println!("{}", map.document().to_svg_string(container.svg)?);
        }
    }
    Ok(())
}
