//! Per-frame orchestration of consolidation and spidering
//!
//! [`MarkerGenerator`] owns every piece of working state for the map: the
//! current input records, their consolidated form and the active spider
//! group. It reacts to three triggers (data changed, viewport changed, marker
//! clicked) and hands out a flat, read-only [`RenderFrame`].

use std::sync::Arc;

use tracing::{debug, warn};

use super::consolidate::consolidate_if_needed;
use super::icon::{IconRef, IconScheme, select_icon};
use super::overlap::find_overlapping;
use super::point::{BBox, Point};
use super::record::{MarkerId, MarkerRecord};
use super::spider::{SpiderLayout, SpideredMarker, spider};
use super::viewport::{Projection, ViewportMetrics};

/// Positions within this many degrees of a stack leader, per axis, join its stack
const SAME_POSITION_TOLERANCE: f64 = 1e-9;

/// Knobs controlling consolidation, spidering and icon choice
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub icon_size_px: f64,
    pub spider_enabled: bool,
    pub show_as_clusters: bool,
    /// Consolidation kicks in once the task count exceeds this
    pub cluster_display_threshold: usize,
    /// Total tasks behind the current view; 0 means "sum the input"
    pub total_task_count: usize,
    pub monochromatic_icons: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            icon_size_px: 40.0,
            spider_enabled: true,
            show_as_clusters: true,
            cluster_display_threshold: 25,
            total_task_count: 0,
            monochromatic_icons: false,
        }
    }
}

impl GeneratorConfig {
    fn cluster_mode(&self, input: &[MarkerRecord]) -> bool {
        let total = if self.total_task_count > 0 {
            self.total_task_count
        } else {
            input.iter().map(|m| m.number_of_points).sum()
        };
        self.show_as_clusters && total > self.cluster_display_threshold
    }
}

/// Last phase the generator went through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    Idle,
    Consolidating,
    Spidering,
    Rendered,
}

/// The active spider group, with map positions already resolved
///
/// Always replaced as a whole; a layout is only meaningful as a set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpiderState {
    markers: SpiderLayout,
}

impl SpiderState {
    fn resolve(layout: SpiderLayout, projection: &dyn Projection) -> Self {
        let markers = layout
            .into_iter()
            .map(|(id, mut spidered)| {
                spidered.marker.position = projection.to_point(&spidered.position_px);
                (id, spidered)
            })
            .collect();
        SpiderState { markers }
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn contains(&self, id: &MarkerId) -> bool {
        self.markers.contains_key(id)
    }

    pub fn get(&self, id: &MarkerId) -> Option<&SpideredMarker> {
        self.markers.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpideredMarker> {
        self.markers.values()
    }
}

/// What happens when a rendered marker is clicked
#[derive(Debug, Clone, PartialEq)]
pub enum ClickIntent {
    SelectTask(MarkerId),
    /// Check for overlapping neighbours and spread them out
    Spiderfy(MarkerId),
    FitBounds(BBox),
    /// Hidden behind a stack leader
    Ignore,
}

/// Request for the map view, returned from event handlers
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCommand {
    FitBounds(BBox),
    SelectTask(MarkerId),
}

/// One marker as the map should draw it
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableMarker {
    pub id: MarkerId,
    pub position: Point,
    pub icon: IconRef,
    /// Markers sharing this exact position, this one included
    pub overlapping_count: usize,
    /// False for stack members drawn under their leader
    pub interactive: bool,
    pub on_click: ClickIntent,
    pub status_meta: Option<String>,
}

/// Segment from a spidered marker back to where it really sits
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderLine {
    pub id: MarkerId,
    pub from: Point,
    pub to: Point,
}

/// Everything the map draws for one render pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    pub markers: Vec<RenderableMarker>,
    pub leader_lines: Vec<LeaderLine>,
    /// Input data generation this frame was built from
    pub generation: u64,
}

/// Turns marker records plus map events into render frames
pub struct MarkerGenerator {
    config: GeneratorConfig,
    state: GeneratorState,
    viewport: Option<ViewportMetrics>,
    input: Vec<MarkerRecord>,
    consolidated: Vec<MarkerRecord>,
    consolidation_stale: bool,
    spider: Arc<SpiderState>,
    initial_load_complete: bool,
    generation: u64,
    last_frame: Option<RenderFrame>,
}

impl MarkerGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        MarkerGenerator {
            config,
            state: GeneratorState::Idle,
            viewport: None,
            input: Vec::new(),
            consolidated: Vec::new(),
            consolidation_stale: false,
            spider: Arc::new(SpiderState::default()),
            initial_load_complete: false,
            generation: 0,
            last_frame: None,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    pub fn viewport(&self) -> Option<&ViewportMetrics> {
        self.viewport.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Markers currently shown before spidering is applied
    pub fn consolidated(&self) -> &[MarkerRecord] {
        &self.consolidated
    }

    /// Snapshot of the active spider group
    pub fn spider_state(&self) -> Arc<SpiderState> {
        Arc::clone(&self.spider)
    }

    /// Switches the icon scheme; takes effect on the next render
    pub fn set_monochromatic_icons(&mut self, monochromatic: bool) {
        self.config.monochromatic_icons = monochromatic;
    }

    /// Replaces the input records
    ///
    /// Invalid records are dropped. The spider group is cleared before anything
    /// else so clicks arriving afterwards only ever see the new data. Returns a
    /// bounds fit exactly once, for the first non-empty load.
    pub fn on_data_changed(&mut self, records: Vec<MarkerRecord>) -> Option<ViewCommand> {
        self.clear_spider();
        self.generation += 1;
        self.state = GeneratorState::Consolidating;

        let received = records.len();
        self.input = records
            .into_iter()
            .filter(|record| match record.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!("dropping marker: {e}");
                    false
                }
            })
            .collect();
        debug!(
            generation = self.generation,
            received,
            kept = self.input.len(),
            "marker input changed"
        );

        self.consolidated = self.input.clone();
        self.consolidation_stale = true;
        self.refresh_consolidation();

        if self.initial_load_complete || self.input.is_empty() {
            return None;
        }
        self.initial_load_complete = true;
        self.input_bounds().map(ViewCommand::FitBounds)
    }

    /// Records a new viewport
    ///
    /// A viewport without pixel area is ignored and the previous one (and the
    /// previous frame) stays in effect. A zoom change clears the spider group;
    /// consolidated clusters are kept until the next data change.
    pub fn on_viewport_changed(&mut self, metrics: ViewportMetrics) {
        if !metrics.is_renderable() {
            debug!(pixel_size = ?metrics.pixel_size, "ignoring unrenderable viewport");
            return;
        }

        let zoom_changed = self.viewport.is_some_and(|prev| prev.zoom != metrics.zoom);
        if zoom_changed {
            debug!(zoom = metrics.zoom, "zoom changed");
            self.clear_spider();
        }

        self.viewport = Some(metrics);
        self.refresh_consolidation();
    }

    /// Handles a click on the marker with `id`
    ///
    /// Clicks on ids that are not part of the current data are ignored.
    pub fn on_marker_clicked(
        &mut self,
        id: &MarkerId,
        projection: &dyn Projection,
    ) -> Option<ViewCommand> {
        let Some(viewport) = self.viewport else {
            debug!(%id, "click before any viewport; ignoring");
            return None;
        };

        if self.spider.contains(id) {
            return Some(ViewCommand::SelectTask(id.clone()));
        }

        let Some(marker) = self.consolidated.iter().find(|m| &m.id == id) else {
            debug!(%id, "click on stale marker; ignoring");
            return None;
        };

        if marker.is_cluster() {
            return match marker.bbox() {
                Ok(bbox) => Some(ViewCommand::FitBounds(bbox)),
                Err(e) => {
                    warn!(%id, "cannot fit to cluster: {e}");
                    None
                }
            };
        }

        if !self.config.spider_enabled {
            return Some(ViewCommand::SelectTask(id.clone()));
        }

        let scale = viewport.scale(self.config.icon_size_px);
        let mut group = vec![marker.clone()];
        group.extend(
            find_overlapping(marker, &self.consolidated, scale.icon_size_deg)
                .into_iter()
                .filter(|m| !m.is_cluster())
                .cloned(),
        );

        if group.len() == 1 {
            self.clear_spider();
            return Some(ViewCommand::SelectTask(id.clone()));
        }

        let focal = projection.to_pixel(&marker.true_position());
        let layout = spider(focal, self.config.icon_size_px, &group);
        debug!(%id, size = layout.len(), "spidering overlapping markers");
        self.spider = Arc::new(SpiderState::resolve(layout, projection));
        self.state = GeneratorState::Spidering;
        None
    }

    /// Builds the frame for the current state
    ///
    /// Without a usable viewport the previous frame is returned unchanged.
    pub fn render(&mut self) -> RenderFrame {
        if self.viewport.is_none() {
            return self.last_frame.clone().unwrap_or_default();
        }

        let spider = Arc::clone(&self.spider);
        let mut placed: Vec<(&MarkerRecord, bool)> = self
            .consolidated
            .iter()
            .filter(|m| !spider.contains(&m.id))
            .map(|m| (m, false))
            .collect();
        placed.extend(spider.iter().map(|s| (&s.marker, true)));

        let scheme = IconScheme::from_monochromatic(self.config.monochromatic_icons);
        let stacks = stack_positions(placed.iter().map(|(m, _)| m.position));

        let markers = placed
            .iter()
            .enumerate()
            .map(|(i, (marker, spidered))| {
                let (overlapping_count, leader) = stacks[i];
                let interactive = leader == i;
                RenderableMarker {
                    id: marker.id.clone(),
                    position: marker.position,
                    icon: select_icon(
                        marker.number_of_points,
                        *spidered,
                        overlapping_count,
                        scheme,
                    ),
                    overlapping_count,
                    interactive,
                    on_click: self.click_intent(marker, *spidered, interactive),
                    status_meta: marker.status_meta.clone(),
                }
            })
            .collect();

        let leader_lines = spider
            .iter()
            .filter_map(|s| {
                s.marker.original_position.map(|to| LeaderLine {
                    id: s.marker.id.clone(),
                    from: s.marker.position,
                    to,
                })
            })
            .collect();

        let frame = RenderFrame {
            markers,
            leader_lines,
            generation: self.generation,
        };
        self.last_frame = Some(frame.clone());
        self.state = GeneratorState::Rendered;
        frame
    }

    fn click_intent(
        &self,
        marker: &MarkerRecord,
        spidered: bool,
        interactive: bool,
    ) -> ClickIntent {
        if !interactive {
            return ClickIntent::Ignore;
        }
        if marker.is_cluster() {
            return marker
                .bbox()
                .map(ClickIntent::FitBounds)
                .unwrap_or(ClickIntent::Ignore);
        }
        if spidered || !self.config.spider_enabled {
            ClickIntent::SelectTask(marker.id.clone())
        } else {
            ClickIntent::Spiderfy(marker.id.clone())
        }
    }

    fn clear_spider(&mut self) {
        if !self.spider.is_empty() {
            debug!(size = self.spider.len(), "clearing spider group");
            self.spider = Arc::new(SpiderState::default());
        }
    }

    fn refresh_consolidation(&mut self) {
        if !self.consolidation_stale {
            return;
        }
        let Some(viewport) = self.viewport else {
            return;
        };

        let scale = viewport.scale(self.config.icon_size_px);
        let cluster_mode = self.config.cluster_mode(&self.input);
        self.consolidated = consolidate_if_needed(&self.input, &scale, cluster_mode);
        self.consolidation_stale = false;
    }

    fn input_bounds(&self) -> Option<BBox> {
        self.input
            .iter()
            .filter_map(|m| m.bbox().ok())
            .reduce(|acc, b| acc.union(&b))
    }
}

/// For each position, returns `(count, leader)`: how many positions share its
/// spot and the index of the first of them
///
/// A position joins the first earlier group whose leader lies within
/// [`SAME_POSITION_TOLERANCE`] on both axes.
fn stack_positions(positions: impl Iterator<Item = Point>) -> Vec<(usize, usize)> {
    let positions: Vec<Point> = positions.collect();
    // (leader index, member count)
    let mut groups: Vec<(usize, usize)> = Vec::new();
    let mut membership = Vec::with_capacity(positions.len());

    for (i, p) in positions.iter().enumerate() {
        let found = groups.iter().position(|&(leader, _)| {
            let q = positions[leader];
            (p.lat - q.lat).abs() <= SAME_POSITION_TOLERANCE
                && (p.lng - q.lng).abs() <= SAME_POSITION_TOLERANCE
        });
        let group = match found {
            Some(g) => g,
            None => {
                groups.push((i, 0));
                groups.len() - 1
            }
        };
        groups[group].1 += 1;
        membership.push(group);
    }

    membership
        .into_iter()
        .map(|g| {
            let (leader, count) = groups[g];
            (count, leader)
        })
        .collect()
}
