use super::model::SurfaceMatrix;
use crate::domain::{JanusError, JanusResult};
use image::{Rgb, RgbImage};
use std::path::Path;

/// Edge length in pixels of one surface grid point.
pub const CELL_PIXELS: u32 = 8;

const MASKED: Rgb<u8> = Rgb([255, 255, 255]);

// Breakpoints of the black-red-yellow-white "hot" colormap.
const RED_RAMP_END: f64 = 0.365079;
const GREEN_RAMP_END: f64 = 0.746032;
const RED_FLOOR: f64 = 0.0416;

/// Maps `fraction` in [0, 1] onto the hot colormap.
pub fn hot_colormap(fraction: f64) -> Rgb<u8> {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    let red = RED_FLOOR + (1.0 - RED_FLOOR) * ramp(fraction, 0.0, RED_RAMP_END);
    let green = ramp(fraction, RED_RAMP_END, GREEN_RAMP_END);
    let blue = ramp(fraction, GREEN_RAMP_END, 1.0);
    Rgb([channel(red), channel(green), channel(blue)])
}

fn ramp(fraction: f64, start: f64, end: f64) -> f64 {
    ((fraction - start) / (end - start)).clamp(0.0, 1.0)
}

fn channel(value: f64) -> u8 {
    (value * 255.0).round() as u8
}

/// Renders the matrix as a heatmap scaled between its own minimum and maximum.
pub fn render_heatmap(matrix: &SurfaceMatrix) -> RgbImage {
    let range = matrix.value_range();
    let width = matrix.columns() as u32 * CELL_PIXELS;
    let height = matrix.rows() as u32 * CELL_PIXELS;

    RgbImage::from_fn(width, height, |x, y| {
        let row = (y / CELL_PIXELS) as usize;
        let column = (x / CELL_PIXELS) as usize;
        match (matrix.get(row, column), range) {
            (Some(value), Some((low, high))) if value.is_finite() => {
                let span = high - low;
                let fraction = if span > 0.0 { (value - low) / span } else { 0.0 };
                hot_colormap(fraction)
            }
            _ => MASKED,
        }
    })
}

pub fn write_heatmap(matrix: &SurfaceMatrix, path: &Path) -> JanusResult<()> {
    render_heatmap(matrix).save(path).map_err(|source| {
        JanusError::io_system(
            "IO.CHISQ_IMAGE",
            format!("failed to write heatmap '{}': {}", path.display(), source),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::{CELL_PIXELS, hot_colormap, render_heatmap, write_heatmap};
    use crate::modules::chisq::model::ChiSquareSurface;
    use crate::modules::chisq::parser::parse_chisq_source;
    use image::Rgb;
    use tempfile::TempDir;

    fn surface() -> ChiSquareSurface {
        let points = parse_chisq_source(
            "0.5\t0.1\t1\t1\t2\n0.6\t0.1\t2\t2\t4\n0.5\t0.2\t3\t3\t6\n0.6\t0.2\t1\t1\t2.5\n",
        )
        .expect("fixture should parse");
        ChiSquareSurface::from_points(&points).expect("surface should build")
    }

    #[test]
    fn colormap_runs_from_dark_red_to_white() {
        assert_eq!(hot_colormap(0.0), Rgb([11, 0, 0]));
        assert_eq!(hot_colormap(1.0), Rgb([255, 255, 255]));
        assert_eq!(hot_colormap(0.5), Rgb([255, 90, 0]));
        assert_eq!(hot_colormap(-3.0), hot_colormap(0.0));
        assert_eq!(hot_colormap(f64::NAN), hot_colormap(0.0));
    }

    #[test]
    fn heatmap_cells_are_scaled_to_matrix_range() {
        let surface = surface();
        let image = render_heatmap(&surface.total);

        assert_eq!(image.width(), 2 * CELL_PIXELS);
        assert_eq!(image.height(), 2 * CELL_PIXELS);
        // Row zero holds the larger second matrix element.
        assert_eq!(*image.get_pixel(0, 0), hot_colormap(1.0));
        assert_eq!(*image.get_pixel(0, CELL_PIXELS), hot_colormap(0.0));
        assert_eq!(
            *image.get_pixel(CELL_PIXELS + 1, CELL_PIXELS + 1),
            hot_colormap(0.5)
        );
    }

    #[test]
    fn masked_cells_are_white() {
        let surface = surface();
        let image = render_heatmap(&surface.one_sigma);
        assert_eq!(*image.get_pixel(0, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn heatmap_is_written_as_png() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("surface_tot.png");
        write_heatmap(&surface().total, &path).expect("heatmap should be written");

        let bytes = std::fs::read(&path).expect("png should be readable");
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let error = write_heatmap(&surface().total, &temp.path().join("missing").join("x.png"))
            .expect_err("missing directory should fail");
        assert_eq!(error.placeholder(), "IO.CHISQ_IMAGE");
    }
}
