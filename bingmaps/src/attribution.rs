//! Crediting the imagery providers visible on the map.

use crate::metadata::{CoverageArea, ImageryProvider};
use crate::projection::{Extent, Projection, intersects, lon_lat};

/// Link to the Bing Maps terms of use. Must always be displayed along with the imagery.
pub const TOS_ATTRIBUTION: &str = "<a class=\"bing-tos\" href=\"https://www.microsoft.com/maps/product/terms.html\" target=\"_blank\">Terms of Use</a>";

/// Snapshot of what is currently visible on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Zoom level of the tiles being rendered.
    pub zoom: u8,

    /// Visible area, in the map projection.
    pub extent: Extent,
}

/// Coverage area, already projected into the map projection.
#[derive(Debug, Clone, PartialEq)]
struct Coverage {
    extent: Extent,
    zoom_min: u8,
    zoom_max: u8,
}

impl Coverage {
    fn new(area: &CoverageArea, projection: &dyn Projection) -> Self {
        let [south, west, north, east] = area.bbox;
        Self {
            extent: projection.transform_extent(lon_lat(west, south), lon_lat(east, north)),
            zoom_min: area.zoom_min,
            zoom_max: area.zoom_max,
        }
    }

    fn active(&self, frame: &FrameState) -> bool {
        (self.zoom_min..=self.zoom_max).contains(&frame.zoom)
            && intersects(&self.extent, &frame.extent)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Provider {
    attribution: String,
    coverage: Vec<Coverage>,
}

/// Decides which imagery providers need to be credited for the visible part of the map.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionResolver {
    providers: Vec<Provider>,
    notice: String,
}

impl AttributionResolver {
    /// Coverage areas are projected once, here, as they never change.
    pub fn new(
        providers: &[ImageryProvider],
        projection: &dyn Projection,
        notice: impl Into<String>,
    ) -> Self {
        let providers = providers
            .iter()
            .map(|provider| Provider {
                attribution: provider.attribution.clone(),
                coverage: provider
                    .coverage_areas
                    .iter()
                    .map(|area| Coverage::new(area, projection))
                    .collect(),
            })
            .collect();

        Self {
            providers,
            notice: notice.into(),
        }
    }

    /// Attributions of the providers covering the frame, in the metadata order, followed by the
    /// fixed notice. Called for every rendered frame.
    pub fn attributions(&self, frame: &FrameState) -> Vec<&str> {
        let mut attributions = Vec::with_capacity(self.providers.len() + 1);

        attributions.extend(
            self.providers
                .iter()
                .filter(|provider| provider.coverage.iter().any(|area| area.active(frame)))
                .map(|provider| provider.attribution.as_str()),
        );

        attributions.push(self.notice.as_str());
        attributions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata;
    use crate::projection::{Geographic, WebMercator, extent};

    fn provider(attribution: &str, areas: &[([f64; 4], u8, u8)]) -> ImageryProvider {
        ImageryProvider {
            attribution: attribution.to_owned(),
            coverage_areas: areas
                .iter()
                .map(|&(bbox, zoom_min, zoom_max)| CoverageArea {
                    bbox,
                    zoom_min,
                    zoom_max,
                })
                .collect(),
        }
    }

    fn whole_world() -> Extent {
        WebMercator.extent()
    }

    #[test]
    fn coverage_is_limited_by_zoom() {
        let resolver = AttributionResolver::new(
            &[provider("Contoso", &[([-90., -180., 90., 180.], 5, 10)])],
            &WebMercator,
            TOS_ATTRIBUTION,
        );

        let frame = |zoom| FrameState {
            zoom,
            extent: whole_world(),
        };

        assert_eq!(vec!["Contoso", TOS_ATTRIBUTION], resolver.attributions(&frame(7)));
        assert_eq!(vec!["Contoso", TOS_ATTRIBUTION], resolver.attributions(&frame(5)));
        assert_eq!(vec!["Contoso", TOS_ATTRIBUTION], resolver.attributions(&frame(10)));
        assert_eq!(vec![TOS_ATTRIBUTION], resolver.attributions(&frame(11)));
        assert_eq!(vec![TOS_ATTRIBUTION], resolver.attributions(&frame(4)));
    }

    #[test]
    fn coverage_is_limited_by_extent() {
        // Poland-ish, given as [south, west, north, east].
        let resolver = AttributionResolver::new(
            &[provider("GUGiK", &[([49., 14., 55., 24.], 1, 21)])],
            &Geographic,
            "ToS",
        );

        let wroclaw = FrameState {
            zoom: 12,
            extent: extent(16.9, 51.0, 17.2, 51.2),
        };
        assert_eq!(vec!["GUGiK", "ToS"], resolver.attributions(&wroclaw));

        let berlin = FrameState {
            zoom: 12,
            extent: extent(13.2, 52.4, 13.6, 52.6),
        };
        assert_eq!(vec!["ToS"], resolver.attributions(&berlin));

        // Axes must not be mixed up: this would match if the box was read as [west, south, ...].
        let mixed_up = FrameState {
            zoom: 12,
            extent: extent(50., 20., 54., 22.),
        };
        assert_eq!(vec!["ToS"], resolver.attributions(&mixed_up));
    }

    #[test]
    fn coverage_is_projected() {
        let resolver = AttributionResolver::new(
            &[provider("GUGiK", &[([49., 14., 55., 24.], 1, 21)])],
            &WebMercator,
            "ToS",
        );

        let wroclaw = FrameState {
            zoom: 12,
            extent: WebMercator.transform_extent(lon_lat(16.9, 51.0), lon_lat(17.2, 51.2)),
        };
        assert_eq!(vec!["GUGiK", "ToS"], resolver.attributions(&wroclaw));

        // Same numbers, but not projected, i.e. somewhere near the null island.
        let unprojected = FrameState {
            zoom: 12,
            extent: extent(16.9, 51.0, 17.2, 51.2),
        };
        assert_eq!(vec!["ToS"], resolver.attributions(&unprojected));
    }

    #[test]
    fn provider_is_credited_once_in_metadata_order() {
        let resolver = AttributionResolver::new(
            &[
                provider("First", &[([-90., -180., 90., 180.], 1, 21)]),
                provider("Nowhere", &[([-1., -1., 0., 0.], 1, 2)]),
                provider(
                    "Second",
                    &[
                        ([-90., -180., 90., 180.], 1, 21),
                        ([-45., -90., 45., 90.], 1, 21),
                    ],
                ),
            ],
            &WebMercator,
            TOS_ATTRIBUTION,
        );

        let frame = FrameState {
            zoom: 3,
            extent: whole_world(),
        };
        assert_eq!(
            vec!["First", "Second", TOS_ATTRIBUTION],
            resolver.attributions(&frame)
        );
    }

    #[test]
    fn notice_is_always_last() {
        let frame = FrameState {
            zoom: 3,
            extent: whole_world(),
        };

        let resolver = AttributionResolver::new(&[], &WebMercator, TOS_ATTRIBUTION);
        assert_eq!(vec![TOS_ATTRIBUTION], resolver.attributions(&frame));

        let resolver = AttributionResolver::new(
            &[provider("Contoso", &[])],
            &WebMercator,
            TOS_ATTRIBUTION,
        );
        assert_eq!(vec![TOS_ATTRIBUTION], resolver.attributions(&frame));
    }

    #[test]
    fn attributions_of_aerial_imagery() {
        let resource = metadata::parse(metadata::tests::AERIAL.as_bytes()).unwrap();
        let resolver =
            AttributionResolver::new(&resource.imagery_providers, &WebMercator, TOS_ATTRIBUTION);

        // Maxar covers the Canary Islands, but only from zoom 14.
        let canary_islands =
            WebMercator.transform_extent(lon_lat(-16.5, 28.0), lon_lat(-16.0, 28.5));

        let frame = FrameState {
            zoom: 10,
            extent: canary_islands,
        };
        assert_eq!(
            vec!["© 2024 Microsoft Corporation", TOS_ATTRIBUTION],
            resolver.attributions(&frame)
        );

        let frame = FrameState {
            zoom: 15,
            extent: canary_islands,
        };
        assert_eq!(
            vec![
                "© 2024 Microsoft Corporation",
                "© 2024 Maxar",
                TOS_ATTRIBUTION
            ],
            resolver.attributions(&frame)
        );
    }
}
