//! Render command - draw map objects onto a tile-projected PNG.

use std::path::PathBuf;
use std::rc::Rc;

use clap::Args;
use geoscene::config::ConfigFile;
use geoscene::coord::{CoordError, MAX_ZOOM};
use geoscene::object::{CircleShape, GeoObject, RectShape};
use geoscene::projector::{MercatorProjector, TileProjector};
use geoscene::render::{Color, SkiaPainter};
use geoscene::scene::MapScene;
use tracing::info;

use super::common::{CircleSpec, LonLat, RectSpec};
use crate::error::CliError;

/// Arguments for the render command.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Viewport center as lon,lat
    #[arg(long, allow_hyphen_values = true)]
    pub center: LonLat,

    /// Zoom level (defaults to map.zoom from config)
    #[arg(long)]
    pub zoom: Option<u8>,

    /// Image width in pixels (defaults to render.width)
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels (defaults to render.height)
    #[arg(long)]
    pub height: Option<u32>,

    /// Circle as lon,lat,radius_m[,#rrggbb] (repeatable)
    #[arg(long = "circle", allow_hyphen_values = true)]
    pub circles: Vec<CircleSpec>,

    /// Rectangle as lon,lat,width_m,height_m[,rotation][,#rrggbb] (repeatable)
    #[arg(long = "rect", allow_hyphen_values = true)]
    pub rects: Vec<RectSpec>,

    /// Select the Nth object (0-based, circles first, then rectangles)
    #[arg(long)]
    pub select: Option<usize>,

    /// Background color (defaults to render.background)
    #[arg(long)]
    pub background: Option<Color>,

    /// Output PNG path
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Objects placed in a scene. The scene only holds weak references, so the
/// objects must outlive rendering.
pub struct BuiltScene {
    pub scene: MapScene,
    pub objects: Vec<Rc<GeoObject>>,
}

/// Create the scene described by `args`, using `config` for anything the
/// arguments leave out.
pub fn build_scene(args: &RenderArgs, config: &ConfigFile) -> Result<BuiltScene, CliError> {
    let zoom = args.zoom.unwrap_or(config.map.zoom);
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom).into());
    }

    let projector: Rc<dyn TileProjector> = Rc::new(MercatorProjector::new(config.map.tile_size));
    let mut scene = MapScene::new(Some(projector), zoom);
    let mut objects = Vec::with_capacity(args.circles.len() + args.rects.len());

    for spec in &args.circles {
        let object = GeoObject::shared(CircleShape::new(spec.radius_m, spec.color));
        object.set_position(spec.center);
        objects.push(object);
    }

    for spec in &args.rects {
        let object = GeoObject::shared(RectShape::new(spec.width_m, spec.height_m, spec.color));
        object.set_position(spec.center);
        object.set_rotation(spec.rotation);
        objects.push(object);
    }

    for object in &objects {
        scene.add_object(object);
    }

    if let Some(index) = args.select {
        let object = objects.get(index).ok_or_else(|| {
            CliError::InvalidArgument(format!(
                "--select {} is out of range ({} objects)",
                index,
                objects.len()
            ))
        })?;
        object.set_selected(true);
    }

    Ok(BuiltScene { scene, objects })
}

/// Paint the scene into a fresh canvas. Returns the canvas and how many
/// objects were drawn.
pub fn paint(
    built: &BuiltScene,
    args: &RenderArgs,
    config: &ConfigFile,
) -> Result<(SkiaPainter, usize), CliError> {
    let width = args.width.unwrap_or(config.render.width);
    let height = args.height.unwrap_or(config.render.height);

    let viewport = built
        .scene
        .viewport_centered_on(args.center.0, width as f64, height as f64)
        .ok_or_else(|| CliError::Config("no tile projector configured".to_string()))?;

    let mut painter = SkiaPainter::new(width, height)?;
    painter.clear(args.background.unwrap_or(config.render.background));
    let painted = built.scene.render(&mut painter, viewport);
    Ok((painter, painted))
}

/// Run the render command.
pub fn run(args: RenderArgs, config: &ConfigFile) -> Result<(), CliError> {
    let built = build_scene(&args, config)?;
    let (painter, painted) = paint(&built, &args, config)?;
    painter.save_png(&args.output)?;

    info!(
        objects = built.objects.len(),
        painted,
        zoom = built.scene.zoom_level(),
        output = %args.output.display(),
        "Rendered scene"
    );
    println!(
        "Rendered {} object(s) at zoom {} to {}",
        painted,
        built.scene.zoom_level(),
        args.output.display()
    );
    Ok(())
}
