use std::fmt;

/// Colour treatment for marker icons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconScheme {
    /// Icons tinted by task status/priority
    Colored,
    Monochromatic,
}

/// Size bucket of a cluster icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterSize {
    Small,
    Medium,
    Large,
}

/// What a marker icon depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    Task,
    /// Task pulled out of an overlapping group
    Spidered,
    /// Several tasks sharing one exact position
    Stack,
    Cluster(ClusterSize),
}

/// Reference to the icon the rendering layer should draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconRef {
    pub kind: IconKind,
    pub scheme: IconScheme,
}

impl IconScheme {
    pub fn from_monochromatic(monochromatic: bool) -> Self {
        if monochromatic {
            IconScheme::Monochromatic
        } else {
            IconScheme::Colored
        }
    }
}

impl ClusterSize {
    pub fn for_points(number_of_points: usize) -> Self {
        match number_of_points {
            0..10 => ClusterSize::Small,
            10..100 => ClusterSize::Medium,
            _ => ClusterSize::Large,
        }
    }
}

/// Picks the icon for a marker
pub fn select_icon(
    number_of_points: usize,
    spidered: bool,
    overlapping_count: usize,
    scheme: IconScheme,
) -> IconRef {
    let kind = if number_of_points > 1 {
        IconKind::Cluster(ClusterSize::for_points(number_of_points))
    } else if spidered {
        IconKind::Spidered
    } else if overlapping_count > 1 {
        IconKind::Stack
    } else {
        IconKind::Task
    };

    IconRef { kind, scheme }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            IconKind::Task => "task",
            IconKind::Spidered => "spidered",
            IconKind::Stack => "stack",
            IconKind::Cluster(ClusterSize::Small) => "cluster-small",
            IconKind::Cluster(ClusterSize::Medium) => "cluster-medium",
            IconKind::Cluster(ClusterSize::Large) => "cluster-large",
        };
        match self.scheme {
            IconScheme::Colored => f.write_str(kind),
            IconScheme::Monochromatic => write!(f, "{kind}-mono"),
        }
    }
}
