//////////////////////////////////////////////////////////////////////
// drawing tilings with cairo: one filled, black-edged polygon per
// triangle, colored by arm index

use std::fs::File;

use crate::errors::*;
use crate::tiling::{Rect2d, Tiling};
use crate::{Matrix3d, Point2d, Transform2d, Translation2d, Vec2d};

// matplotlib's tab10 palette; arms cycle through it
const TAB10: [[f64; 3]; 10] = [
    [0.12156862745098039, 0.4666666666666667, 0.7058823529411765],
    [1.0, 0.4980392156862745, 0.054901960784313725],
    [0.17254901960784313, 0.6274509803921569, 0.17254901960784313],
    [0.8392156862745098, 0.15294117647058825, 0.1568627450980392],
    [0.5803921568627451, 0.403921568627451, 0.7411764705882353],
    [0.5490196078431373, 0.33725490196078434, 0.29411764705882354],
    [0.8901960784313725, 0.4666666666666667, 0.7607843137254902],
    [0.4980392156862745, 0.4980392156862745, 0.4980392156862745],
    [0.7372549019607844, 0.7411764705882353, 0.13333333333333333],
    [0.09019607843137255, 0.7450980392156863, 0.8117647058823529],
];

// fraction of the tiling extent left as margin on each side
const BOUNDS_PAD: f64 = 0.02;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OutputFormat {
    Pdf,
    Png
}

impl OutputFormat {

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Png => "png"
        }
    }

}

#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    pub format: OutputFormat,
    pub square: bool,      // force x and y extents to match
    pub width: f64,        // output width in points (pdf) or pixels (png)
    pub line_width: f64,   // triangle edge width in output units
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            format: OutputFormat::Pdf,
            square: false,
            width: 576.0,
            line_width: 1.0
        }
    }
}

//////////////////////////////////////////////////////////////////////
//
// make a Transform2d that will translate and scale the given
// contents_rect (input) to the given page_rect (output).
//
// always includes vertical flip because graphics coordinate system
// is left-handed (y increases going down)
//

pub fn get_page_transform(contents_rect: &Rect2d,
                          page_rect: &Rect2d) -> (Transform2d, f64) {

    let cdims = contents_rect.dims();
    let pdims = page_rect.dims();

    let scl = (pdims.component_div(&cdims)).min();

    let vmid = contents_rect.center();
    let pmid = page_rect.center();

    let translate_page = Translation2d::new(pmid[0], pmid[1]);

    let scale = Transform2d::from_matrix_unchecked(
        Matrix3d::new(
            scl, 0.0, 0.0,
            0.0, -scl, 0.0,
            0.0, 0.0, 1.0
        )
    );

    let translate_points = Translation2d::new(-vmid[0], -vmid[1]);

    let transform = translate_page * scale * translate_points;

    (transform, scl)

}

// region of the design plane that gets drawn
pub fn contents_rect(tiling: &Tiling, square: bool) -> Rect2d {

    let mut rect = tiling.bounds().padded(BOUNDS_PAD);

    if square {
        let dims = rect.dims();
        rect.p1.y = rect.p0.y + dims.x;
    }

    rect

}

//////////////////////////////////////////////////////////////////////

trait CairoVecOps {

    fn moveto(&self, p: &Point2d);
    fn lineto(&self, p: &Point2d);
    fn setcolor(&self, rgb: &[f64; 3]);
    fn drawtri(&self, p0: &Point2d, p1: &Point2d, p2: &Point2d);

}

impl CairoVecOps for cairo::Context {

    fn moveto(&self, p: &Point2d) {
        self.move_to(p.x, p.y);
    }

    fn lineto(&self, p: &Point2d) {
        self.line_to(p.x, p.y);
    }

    fn setcolor(&self, rgb: &[f64; 3]) {
        self.set_source_rgb(rgb[0], rgb[1], rgb[2]);
    }

    fn drawtri(&self, p0: &Point2d, p1: &Point2d, p2: &Point2d) {
        self.moveto(p0);
        self.lineto(p1);
        self.lineto(p2);
        self.close_path();
    }

}

pub fn arm_color(arm_idx: usize) -> &'static [f64; 3] {
    &TAB10[arm_idx % TAB10.len()]
}

fn draw_tiling(ctx: &cairo::Context,
               tiling: &Tiling,
               xform: &Transform2d,
               line_width: f64) {

    ctx.set_line_width(line_width);
    ctx.set_line_join(cairo::LineJoin::Miter);

    for (arm_idx, arm) in tiling.iter() {

        let color = arm_color(arm_idx);

        for tri in arm.iter() {

            let p_c = xform * tri.p_c;
            let p_b = xform * tri.p_b;
            let p_a = xform * tri.p_a;

            ctx.drawtri(&p_c, &p_b, &p_a);
            ctx.setcolor(color);
            ctx.fill_preserve();
            ctx.set_source_rgb(0.0, 0.0, 0.0);
            ctx.stroke();

        }

    }

}

//////////////////////////////////////////////////////////////////////
// write the tiling to filename in the requested format

pub fn render(tiling: &Tiling,
              settings: &RenderSettings,
              filename: &str) -> Result<()> {

    let contents = contents_rect(tiling, settings.square);

    let cdims = contents.dims();

    if !(cdims.x > 0.0 && cdims.y > 0.0) {
        bail!("tiling has empty extent {:?}", cdims);
    }

    let page_dims = Vec2d::new(settings.width, settings.width * cdims.y / cdims.x);
    let page_rect = Rect2d::new(Point2d::origin(), Point2d::origin() + page_dims);

    let (xform, _) = get_page_transform(&contents, &page_rect);

    match settings.format {

        OutputFormat::Pdf => {

            let surface = cairo::PdfSurface::new(page_dims[0], page_dims[1], filename)?;
            let ctx = cairo::Context::new(&surface);

            draw_tiling(&ctx, tiling, &xform, settings.line_width);

            ctx.show_page();
            surface.finish();

        }

        OutputFormat::Png => {

            let surface = cairo::ImageSurface::create(cairo::Format::ARgb32,
                                                      page_dims[0].ceil() as i32,
                                                      page_dims[1].ceil() as i32)?;
            let ctx = cairo::Context::new(&surface);

            ctx.set_source_rgb(1.0, 1.0, 1.0);
            ctx.paint();

            draw_tiling(&ctx, tiling, &xform, settings.line_width);

            surface.flush();

            let mut file = File::create(filename)
                .chain_err(|| format!("creating {:}", filename))?;

            surface.write_to_png(&mut file)
                .map_err(|e| format!("writing {:}: {:?}", filename, e))?;

        }

    }

    tracing::info!(file = filename, width = page_dims[0], height = page_dims[1], "wrote tiling");

    Ok(())

}
