//! Application state — owns the atlas, the GPU context, and the
//! renderer, and turns the demo content into frames.

use tessera_render::{AtlasTextures, CameraUniform, FrameStats, RenderContext, RenderError, Renderer};
use tessera_text::{fonts, Atlas, Cell, FontRaster, Grid, Quad};

/// Rasterization pixel height of the demo atlas.
const PIXEL_HEIGHT: f32 = 48.0;

/// Side length of each atlas page.
const PAGE_SIDE: u32 = 1024;

/// Text drawn every frame.
const DEMO_LINES: [(&str, f32); 4] = [
    ("ABCDEFGHIJKLMNOPQRSTUVWXYZ", 50.0),
    ("abcdefghijklmnopqrstuvwxyz", 150.0),
    ("The Quick Brown Fox Jumps", 250.0),
    ("Over The Lazy Dog", 290.0),
];

/// Owns the whole pipeline for the running window.
pub struct AppState {
    pub ctx: RenderContext,
    renderer: Renderer,
    atlas: Atlas<FontRaster, AtlasTextures>,
    width: u32,
    height: u32,
}

impl AppState {
    /// Build the GPU pipeline and the atlas. All failures here are
    /// startup configuration errors; the caller terminates on them.
    pub fn new(ctx: RenderContext, width: u32, height: u32) -> Result<Self, String> {
        let font = fonts::discover_monospace().map_err(|e| e.to_string())?;
        let raster = FontRaster::new(font, PIXEL_HEIGHT);

        let mut renderer = Renderer::new(&ctx);
        renderer.set_clear_color(1.0, 1.0, 1.0, 1.0);

        let textures = AtlasTextures::new(&ctx, renderer.page_layout());
        let atlas = Atlas::new(raster, textures, PAGE_SIDE).map_err(|e| e.to_string())?;

        Ok(Self {
            ctx,
            renderer,
            atlas,
            width,
            height,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.ctx.resize(width, height);
    }

    /// Lay out the demo lines and render one frame.
    pub fn render_frame(&mut self) -> Result<FrameStats, RenderError> {
        let mut quads: Vec<Quad> = Vec::new();
        for (line, baseline) in DEMO_LINES {
            // An oversize glyph is a configuration error: the page
            // side cannot hold the face at this pixel height. That is
            // the one fatal path, and it terminates the process.
            let run = match self.atlas.layout_text(line, 8.0, baseline, 1.0, 1.0) {
                Ok(run) => run,
                Err(e) => {
                    eprintln!("fatal: {e}");
                    std::process::exit(1);
                }
            };
            quads.extend(run.quads);
        }

        let camera = CameraUniform::orthographic(self.width as f32, self.height as f32);
        self.renderer
            .prepare(&self.ctx, &quads, &camera, [0.0, 0.0, 0.0, 1.0]);
        self.renderer.render_to_surface(&self.ctx, self.atlas.surfaces())
    }
}

/// Dump a 10×5 surface of character cells to stdout before the window
/// appears, as a quick sanity check of the grid container.
pub fn print_demo_grid() {
    let mut grid: Grid<Cell> = Grid::new(10, 5);
    grid.fill(Cell {
        ch: 'A',
        ..Cell::default()
    });

    for y in 0..grid.rows() {
        let row: String = (0..grid.cols())
            .filter_map(|x| grid.get(x, y))
            .flat_map(|cell| [cell.ch, ' '])
            .collect();
        println!("{}", row.trim_end());
    }
}
