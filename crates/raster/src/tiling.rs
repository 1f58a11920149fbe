use crate::error::RasterError;
use folio_types::PageGeometry;

// Remainders below this are rounding noise, not another page.
const EPSILON: f32 = 0.01;

/// Where the image sits on one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSlice {
    pub page_index: usize,
    /// Distance from the page's top edge to the image's top edge, in points.
    /// Negative once earlier pages have shown the top of the image.
    pub vertical_offset: f32,
}

/// The result of tiling one image across pages.
#[derive(Debug, Clone, PartialEq)]
pub struct TilePlan {
    pub content_width: f32,
    pub content_height: f32,
    pub printable_height: f32,
    pub slices: Vec<PageSlice>,
}

impl TilePlan {
    /// Tiles content of the given size (points) across pages of `geometry`.
    pub fn for_content(
        content_width: f32,
        content_height: f32,
        geometry: &PageGeometry,
    ) -> Result<Self, RasterError> {
        let printable_height = geometry.printable_height();
        if printable_height <= 0.0 {
            return Err(RasterError::Configuration(format!(
                "margin {:.2}pt leaves no printable height on a {:.2}pt tall page",
                geometry.margin, geometry.height
            )));
        }
        if content_width <= 0.0 {
            return Err(RasterError::Configuration(format!(
                "margin {:.2}pt leaves no printable width on a {:.2}pt wide page",
                geometry.margin, geometry.width
            )));
        }
        if !content_height.is_finite() || content_height < 0.0 {
            return Err(RasterError::Configuration(format!(
                "invalid content height {}",
                content_height
            )));
        }

        let margin = geometry.margin;
        let mut slices = vec![PageSlice {
            page_index: 0,
            vertical_offset: margin,
        }];
        let mut height_left = content_height - printable_height;
        while height_left > EPSILON {
            slices.push(PageSlice {
                page_index: slices.len(),
                vertical_offset: height_left - content_height + margin,
            });
            height_left -= printable_height;
        }

        Ok(Self {
            content_width,
            content_height,
            printable_height,
            slices,
        })
    }

    pub fn page_count(&self) -> usize {
        self.slices.len()
    }
}

/// Plans pages for a `pixel_width` x `pixel_height` image scaled to the
/// printable width of `geometry`, keeping its aspect ratio.
pub fn plan_tiles(
    pixel_width: u32,
    pixel_height: u32,
    geometry: &PageGeometry,
) -> Result<TilePlan, RasterError> {
    if pixel_width == 0 || pixel_height == 0 {
        return Err(RasterError::Capture(folio_traits::CaptureError::ZeroSize {
            width: pixel_width,
            height: pixel_height,
        }));
    }
    let content_width = geometry.content_width();
    let content_height = pixel_height as f32 * content_width / pixel_width as f32;
    TilePlan::for_content(content_width, content_height, geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tall_content_spans_three_pages() {
        let geometry = PageGeometry::new(1000.0, 1000.0, 10.0);
        let plan = TilePlan::for_content(980.0, 2500.0, &geometry).unwrap();
        assert_eq!(plan.page_count(), 3);
        assert_eq!(plan.page_count(), (2500.0f32 / 980.0).ceil() as usize);

        let offsets: Vec<f32> = plan.slices.iter().map(|s| s.vertical_offset).collect();
        assert_eq!(offsets, vec![10.0, -970.0, -1950.0]);
        // Each page exposes the slice right below the previous one
        for pair in plan.slices.windows(2) {
            assert_eq!(pair[0].vertical_offset - pair[1].vertical_offset, plan.printable_height);
        }
    }

    #[test]
    fn test_page_count_matches_ceiling() {
        let geometry = PageGeometry::new(595.28, 841.89, 28.35);
        for height in [1.0f32, 500.0, 1000.0, 4000.0, 12345.6] {
            let plan = TilePlan::for_content(500.0, height, &geometry).unwrap();
            let expected = (height / geometry.printable_height()).ceil() as usize;
            assert_eq!(plan.page_count(), expected, "height {}", height);
        }
    }

    #[test]
    fn test_exact_multiple_adds_no_empty_page() {
        let geometry = PageGeometry::new(1000.0, 1000.0, 10.0);
        let plan = TilePlan::for_content(980.0, 1960.0, &geometry).unwrap();
        assert_eq!(plan.page_count(), 2);
    }

    #[test]
    fn test_short_content_is_one_page() {
        let geometry = PageGeometry::new(200.0, 300.0, 10.0);
        let plan = TilePlan::for_content(180.0, 50.0, &geometry).unwrap();
        assert_eq!(plan.slices, vec![PageSlice { page_index: 0, vertical_offset: 10.0 }]);
    }

    #[test]
    fn test_margin_too_large_is_rejected() {
        let geometry = PageGeometry::new(200.0, 300.0, 150.0);
        let err = TilePlan::for_content(100.0, 1000.0, &geometry).unwrap_err();
        assert!(matches!(err, RasterError::Configuration(_)));

        let geometry = PageGeometry::new(200.0, 300.0, 160.0);
        assert!(matches!(
            plan_tiles(100, 100, &geometry),
            Err(RasterError::Configuration(_))
        ));
    }

    #[test]
    fn test_plan_preserves_aspect_ratio() {
        let geometry = PageGeometry::new(220.0, 1000.0, 10.0);
        let plan = plan_tiles(400, 1000, &geometry).unwrap();
        assert_eq!(plan.content_width, 200.0);
        assert_eq!(plan.content_height, 500.0);
        assert_eq!(plan.page_count(), 1);
    }

    #[test]
    fn test_zero_sized_image_is_a_capture_error() {
        let geometry = PageGeometry::new(220.0, 1000.0, 10.0);
        assert!(matches!(plan_tiles(0, 10, &geometry), Err(RasterError::Capture(_))));
    }
}
