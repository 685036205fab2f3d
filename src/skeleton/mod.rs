pub mod loader;

use std::{
    collections::BTreeMap,
    fmt::Display,
    ops::{Add, Div, Sub},
    str::FromStr,
};

pub use loader::{load_pose_sequence, read_pose_sequence};

/// Number of recorded joints in the bipedal skeleton, `CoM` excluded.
pub const SKELETON_JOINT_COUNT: usize = 15;

/// Identifier of a skeleton joint. Variants are declared in topology order, which is
/// also the column order of the joint position file. `CoM` is synthesized after load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JointName {
    LeftFoot,
    LeftKnee,
    LeftHip,
    LeftUpperHip,
    LeftUpperKnee,
    LeftLowerKnee,
    LeftAnkle,
    RightAnkle,
    RightLowerKnee,
    RightUpperKnee,
    RightUpperHip,
    RightHip,
    RightKnee,
    RightLowKnee,
    RightFoot,
    CoM,
}

/// Recorded joints in column order.
pub const SKELETON_JOINTS: [JointName; SKELETON_JOINT_COUNT] = [
    JointName::LeftFoot,
    JointName::LeftKnee,
    JointName::LeftHip,
    JointName::LeftUpperHip,
    JointName::LeftUpperKnee,
    JointName::LeftLowerKnee,
    JointName::LeftAnkle,
    JointName::RightAnkle,
    JointName::RightLowerKnee,
    JointName::RightUpperKnee,
    JointName::RightUpperHip,
    JointName::RightHip,
    JointName::RightKnee,
    JointName::RightLowKnee,
    JointName::RightFoot,
];

/// Joint pairs joined by a rendered segment.
pub const CONNECTIONS: [(JointName, JointName); 14] = [
    (JointName::LeftFoot, JointName::LeftKnee),
    (JointName::LeftKnee, JointName::LeftHip),
    (JointName::LeftHip, JointName::LeftUpperHip),
    (JointName::LeftUpperHip, JointName::LeftUpperKnee),
    (JointName::LeftUpperKnee, JointName::LeftLowerKnee),
    (JointName::LeftLowerKnee, JointName::LeftAnkle),
    (JointName::LeftAnkle, JointName::RightAnkle),
    (JointName::RightAnkle, JointName::RightLowerKnee),
    (JointName::RightLowerKnee, JointName::RightUpperKnee),
    (JointName::RightUpperKnee, JointName::RightUpperHip),
    (JointName::RightUpperHip, JointName::RightHip),
    (JointName::RightHip, JointName::RightKnee),
    (JointName::RightKnee, JointName::RightLowKnee),
    (JointName::RightKnee, JointName::RightFoot),
];

impl JointName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeftFoot => "left_foot",
            Self::LeftKnee => "left_knee",
            Self::LeftHip => "left_hip",
            Self::LeftUpperHip => "left_upper_hip",
            Self::LeftUpperKnee => "left_upper_knee",
            Self::LeftLowerKnee => "left_lower_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::RightLowerKnee => "right_lower_knee",
            Self::RightUpperKnee => "right_upper_knee",
            Self::RightUpperHip => "right_upper_hip",
            Self::RightHip => "right_hip",
            Self::RightKnee => "right_knee",
            Self::RightLowKnee => "right_low_knee",
            Self::RightFoot => "right_foot",
            Self::CoM => "CoM",
        }
    }

    /// Human readable label, e.g. `Left_foot` for `left_foot`.
    pub fn capitalized(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl Display for JointName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JointName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SKELETON_JOINTS
            .iter()
            .chain(std::iter::once(&JointName::CoM))
            .find(|j| j.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown joint name: {s}"))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub const ORIGIN: Point3D = Point3D {
        x: 0.,
        y: 0.,
        z: 0.,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Maps the recording convention onto the display convention where z is up:
    /// `(x, y, z) -> (x, -z, y)`.
    pub fn to_display_axes(self) -> Self {
        Self {
            x: self.x,
            y: -self.z,
            z: self.y,
        }
    }
}

impl Add for Point3D {
    type Output = Point3D;

    fn add(self, rhs: Self) -> Self::Output {
        Point3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3D {
    type Output = Point3D;

    fn sub(self, rhs: Self) -> Self::Output {
        Point3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Div<f64> for Point3D {
    type Output = Point3D;

    fn div(self, rhs: f64) -> Self::Output {
        Point3D::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// Joint coordinates of a single recorded time step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pose {
    joints: BTreeMap<JointName, Point3D>,
}

impl Pose {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, joint: JointName, point: Point3D) {
        self.joints.insert(joint, point);
    }

    pub fn get(&self, joint: JointName) -> Option<Point3D> {
        self.joints.get(&joint).copied()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn contains(&self, joint: JointName) -> bool {
        self.joints.contains_key(&joint)
    }

    /// Joints in topology order, `CoM` last.
    pub fn iter(&self) -> impl Iterator<Item = (JointName, Point3D)> + '_ {
        self.joints.iter().map(|(j, p)| (*j, *p))
    }

    pub fn joint_names(&self) -> impl Iterator<Item = JointName> + '_ {
        self.joints.keys().copied()
    }

    /// Arithmetic mean of the recorded skeleton joints present in the pose.
    pub fn center_of_mass(&self) -> Option<Point3D> {
        let (sum, count) = SKELETON_JOINTS
            .iter()
            .filter_map(|j| self.get(*j))
            .fold((Point3D::ORIGIN, 0usize), |(sum, n), p| (sum + p, n + 1));
        if count == 0 {
            return None;
        }
        Some(sum / count as f64)
    }

    /// Translates every joint so `left_foot` sits at the origin, then switches to display axes.
    /// Poses without a `left_foot` are only reoriented.
    pub fn re_root(&mut self) {
        let anchor = self.get(JointName::LeftFoot).unwrap_or(Point3D::ORIGIN);
        for point in self.joints.values_mut() {
            *point = (*point - anchor).to_display_axes();
        }
    }
}

impl FromIterator<(JointName, Point3D)> for Pose {
    fn from_iter<T: IntoIterator<Item = (JointName, Point3D)>>(iter: T) -> Self {
        Self {
            joints: iter.into_iter().collect(),
        }
    }
}

/// Poses of a recording, one per time step. Immutable once loaded.
#[derive(Clone, Debug, Default)]
pub struct PoseSequence {
    poses: Vec<Pose>,
}

impl PoseSequence {
    pub(crate) fn from_poses(poses: Vec<Pose>) -> Self {
        Self { poses }
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn get(&self, frame: usize) -> Option<&Pose> {
        self.poses.get(frame)
    }

    pub fn first(&self) -> Option<&Pose> {
        self.poses.first()
    }

    pub fn last(&self) -> Option<&Pose> {
        self.poses.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pose> {
        self.poses.iter()
    }
}
