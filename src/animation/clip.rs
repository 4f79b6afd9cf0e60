use glam::{Mat4, Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::tracks::KeyframeTrack;
use crate::errors::InvariantViolation;

/// Keyframes animating one node: translation, rotation and scale, each with
/// its own key count and key times.
#[derive(Debug, Clone)]
pub struct NodeChannel {
    pub node_name: String,
    pub positions: KeyframeTrack<Vec3>,
    pub rotations: KeyframeTrack<Quat>,
    pub scales: KeyframeTrack<Vec3>,
}

impl NodeChannel {
    #[must_use]
    pub fn new(
        node_name: impl Into<String>,
        positions: KeyframeTrack<Vec3>,
        rotations: KeyframeTrack<Quat>,
        scales: KeyframeTrack<Vec3>,
    ) -> Self {
        Self {
            node_name: node_name.into(),
            positions,
            rotations,
            scales,
        }
    }

    /// Local transform `T(time) · R(time) · S(time)`.
    ///
    /// `bind_pose` supplies the component for any track that has no keys.
    pub fn local_transform(&self, time: f32, bind_pose: Mat4) -> Result<Mat4, InvariantViolation> {
        let (bind_scale, bind_rotation, bind_translation) = bind_pose.to_scale_rotation_translation();

        let translation = self
            .positions
            .sample(time)
            .map_err(|source| self.violation("position", source))?
            .unwrap_or(bind_translation);
        let rotation = self
            .rotations
            .sample(time)
            .map_err(|source| self.violation("rotation", source))?
            .unwrap_or(bind_rotation);
        let scale = self
            .scales
            .sample(time)
            .map_err(|source| self.violation("scale", source))?
            .unwrap_or(bind_scale);

        Ok(Mat4::from_scale_rotation_translation(scale, rotation, translation))
    }

    fn violation(
        &self,
        property: &'static str,
        source: crate::animation::tracks::KeyframeRangeError,
    ) -> InvariantViolation {
        InvariantViolation::InterpolationFactor {
            node: self.node_name.clone(),
            property,
            source,
        }
    }

    fn end_time(&self) -> f32 {
        self.positions
            .end_time()
            .max(self.rotations.end_time())
            .max(self.scales.end_time())
    }
}

/// A named animation: one channel per animated node.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    channels: Vec<NodeChannel>,
    lookup: FxHashMap<String, usize>,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: impl Into<String>, channels: Vec<NodeChannel>) -> Self {
        let duration = channels
            .iter()
            .map(NodeChannel::end_time)
            .fold(0.0_f32, f32::max);

        // First channel wins when several target the same node name.
        let mut lookup = FxHashMap::default();
        for (index, channel) in channels.iter().enumerate() {
            lookup.entry(channel.node_name.clone()).or_insert(index);
        }

        Self {
            name: name.into(),
            duration,
            channels,
            lookup,
        }
    }

    #[inline]
    #[must_use]
    pub fn channels(&self) -> &[NodeChannel] {
        &self.channels
    }

    /// Channel animating the node with exactly this name.
    #[must_use]
    pub fn channel(&self, node_name: &str) -> Option<&NodeChannel> {
        self.lookup.get(node_name).map(|&index| &self.channels[index])
    }
}
