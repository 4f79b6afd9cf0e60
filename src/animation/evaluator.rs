use glam::Mat4;

use crate::animation::clip::AnimationClip;
use crate::errors::InvariantViolation;
use crate::scene::node::NodeTree;
use crate::scene::skeleton::BoneTable;

/// Computes skinning palettes for one clip over a node tree.
///
/// Holds only borrows; every call recomputes the palette from scratch, so
/// calls with the same time produce identical output.
#[derive(Debug, Clone, Copy)]
pub struct PoseEvaluator<'a> {
    nodes: &'a NodeTree,
    bones: &'a BoneTable,
    clip: Option<&'a AnimationClip>,
    global_inverse: Mat4,
}

impl<'a> PoseEvaluator<'a> {
    /// `clip` may be `None`, in which case every node keeps its bind pose.
    #[must_use]
    pub fn new(
        nodes: &'a NodeTree,
        bones: &'a BoneTable,
        clip: Option<&'a AnimationClip>,
        global_inverse: Mat4,
    ) -> Self {
        Self {
            nodes,
            bones,
            clip,
            global_inverse,
        }
    }

    /// Palette of final bone transforms at `time`, indexed by bone index.
    pub fn evaluate(&self, time: f32) -> Result<Vec<Mat4>, InvariantViolation> {
        let mut palette = Vec::with_capacity(self.bones.len());
        self.evaluate_into(time, &mut palette)?;
        Ok(palette)
    }

    /// Like [`evaluate`](Self::evaluate), reusing `palette`'s allocation.
    ///
    /// `palette` is resized to the bone count. Bones with no matching node
    /// are left as identity. On error its contents are unspecified.
    pub fn evaluate_into(&self, time: f32, palette: &mut Vec<Mat4>) -> Result<(), InvariantViolation> {
        palette.clear();
        palette.resize(self.bones.len(), Mat4::IDENTITY);

        self.nodes.walk(|index, node, parent_world| {
            if self.nodes.is_synthetic(index) {
                return Ok(parent_world * node.transform);
            }

            let local = match self.clip.and_then(|clip| clip.channel(&node.name)) {
                Some(channel) => channel.local_transform(time, node.transform)?,
                None => node.transform,
            };
            let world = parent_world * local;

            if let Some(bone) = self
                .bones
                .index_of(&node.name)
                .and_then(|index| self.bones.get(index))
            {
                palette[bone.index as usize] = self.global_inverse * world * bone.inverse_bind;
            }

            Ok(world)
        })
    }
}
