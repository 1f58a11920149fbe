use crate::error::RasterError;
use crate::tiling::{PageSlice, TilePlan};
use folio_render_lopdf::PdfWriter;
use folio_traits::RasterImage;
use folio_types::{Color, PageGeometry};
use lopdf::content::{Content, Operation};
use lopdf::{Object, dictionary};
use log::debug;

const IMAGE_NAME: &str = "Im1";

/// Writes one page per slice of `plan`, all drawing the same image XObject
/// clipped to the printable area.
pub fn write_tiled_pdf(
    image: &RasterImage,
    plan: &TilePlan,
    geometry: &PageGeometry,
    background: Color,
) -> Result<Vec<u8>, RasterError> {
    let rgb = composite_over(image.pixels(), background);

    let mut writer = PdfWriter::new();
    let image_id = writer.add_compressed_stream(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width() as i64,
            "Height" => image.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        &rgb,
    )?;
    writer.set_resources(dictionary! {
        "XObject" => dictionary! { IMAGE_NAME => image_id },
    });

    for slice in &plan.slices {
        let content = page_content(slice, plan, geometry, background);
        writer.add_page(content, geometry.width, geometry.height)?;
    }
    debug!(
        "Tiled {}x{} image over {} pages",
        image.width(),
        image.height(),
        writer.page_count()
    );
    Ok(writer.finish()?)
}

fn page_content(slice: &PageSlice, plan: &TilePlan, geometry: &PageGeometry, background: Color) -> Content {
    let mut operations = Vec::new();
    if background != Color::WHITE {
        let [r, g, b] = background.to_unit_rgb();
        operations.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        operations.push(Operation::new(
            "re",
            vec![0.0f32.into(), 0.0f32.into(), geometry.width.into(), geometry.height.into()],
        ));
        operations.push(Operation::new("f", vec![]));
    }

    let margin = geometry.margin;
    let clip = geometry.printable_area();
    // PDF y grows upwards: the image's bottom edge sits this far above the page bottom
    let image_y = geometry.height - slice.vertical_offset - plan.content_height;
    operations.extend([
        Operation::new("q", vec![]),
        Operation::new(
            "re",
            vec![
                clip.x.into(),
                (geometry.height - clip.bottom()).into(),
                clip.width.into(),
                clip.height.into(),
            ],
        ),
        Operation::new("W", vec![]),
        Operation::new("n", vec![]),
        Operation::new(
            "cm",
            vec![
                plan.content_width.into(),
                0.0f32.into(),
                0.0f32.into(),
                plan.content_height.into(),
                margin.into(),
                image_y.into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]);
    Content { operations }
}

/// Flattens straight RGBA onto `background`, yielding RGB.
fn composite_over(rgba: &[u8], background: Color) -> Vec<u8> {
    let bg = [background.r, background.g, background.b];
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let alpha = px[3] as u32;
        for channel in 0..3 {
            let value = (px[channel] as u32 * alpha + bg[channel] as u32 * (255 - alpha) + 127) / 255;
            rgb.push(value as u8);
        }
    }
    rgb
}
