/*
  Copyright 2017 Takashi Ogura

  Licensed under the Apache License, Version 2.0 (the "License");
  you may not use this file except in compliance with the License.
  You may obtain a copy of the License at

      http://www.apache.org/licenses/LICENSE-2.0

  Unless required by applicable law or agreed to in writing, software
  distributed under the License is distributed on an "AS IS" BASIS,
  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
  See the License for the specific language governing permissions and
  limitations under the License.
*/
use crate::errors::*;
use crate::frame::Frame;
use crate::graph::*;
use crate::iterator::*;
use crate::joint::Joint;
use crate::transform::Transform;
use na::{DMatrix, DVector, RealField};
use nalgebra as na;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display};
use tracing::{debug, warn};

mod generalized;
mod operational;
mod sampling;

/// Kinematic tree of frames connected by transforms
///
/// Frames and transforms are added one by one. `update()` has to be called
/// after every structural change; it walks the tree depth-first from the
/// world frame and caches the ordered sequences of frames, bodies, joints,
/// transforms, leaves and tools. All flattened accessors follow the joint
/// order of the last `update()`.
///
/// # Examples
///
/// ```
/// use kmodel::*;
///
/// let mut model = Model::<f64>::with_seed(0);
/// let world = model.add_frame(Frame::world("world")).unwrap();
/// let link = model.add_frame(Frame::body("link")).unwrap();
/// let joint = JointBuilder::new()
///     .joint_type(JointType::Revolute { axis: Vector3::z_axis() })
///     .into_transform("joint");
/// model.add_transform(joint, world, link).unwrap();
/// model.update().unwrap();
///
/// assert_eq!(model.dof(), 1);
/// assert_eq!(model.operational_dof(), 1);
/// model.set_position(&[0.5]).unwrap();
/// assert_eq!(model.position()[0], 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Model<T: RealField> {
    name: String,
    manufacturer: String,
    graph: KinematicGraph<T>,
    root: Option<FrameId>,
    elements: Vec<Element>,
    frames: Vec<FrameId>,
    bodies: Vec<FrameId>,
    joints: Vec<TransformId>,
    transforms: Vec<TransformId>,
    leaves: Vec<FrameId>,
    tools: Vec<TransformId>,
    gamma_position: DMatrix<T>,
    gamma_velocity: DMatrix<T>,
    inv_gamma_position: DMatrix<T>,
    inv_gamma_velocity: DMatrix<T>,
    home_position: DVector<T>,
    rng: ChaCha8Rng,
}

impl<T> Default for Model<T>
where
    T: RealField + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Model<T>
where
    T: RealField + Copy,
{
    /// Empty model whose sampler is seeded from the operating system
    pub fn new() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }

    /// Empty model with a reproducible sampler
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(rng: ChaCha8Rng) -> Self {
        Self {
            name: String::new(),
            manufacturer: String::new(),
            graph: KinematicGraph::new(),
            root: None,
            elements: Vec::new(),
            frames: Vec::new(),
            bodies: Vec::new(),
            joints: Vec::new(),
            transforms: Vec::new(),
            leaves: Vec::new(),
            tools: Vec::new(),
            gamma_position: DMatrix::identity(0, 0),
            gamma_velocity: DMatrix::identity(0, 0),
            inv_gamma_position: DMatrix::identity(0, 0),
            inv_gamma_velocity: DMatrix::identity(0, 0),
            home_position: DVector::zeros(0),
            rng,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }
    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }
    pub fn set_manufacturer(&mut self, manufacturer: &str) {
        self.manufacturer = manufacturer.to_owned();
    }

    /// Add a frame. A world frame becomes the root of the model.
    ///
    /// Only one world frame is accepted.
    pub fn add_frame(&mut self, frame: Frame<T>) -> Result<FrameId, Error> {
        let is_world = frame.is_world();
        if is_world {
            if let Some(root) = self.root {
                warn!(
                    "world frame {} rejected, {} is already the root",
                    frame.name, self.graph[root].name
                );
                return Err(Error::MultipleWorldsError { name: frame.name });
            }
        }
        let id = self.graph.add_vertex(frame);
        if is_world {
            self.root = Some(id);
        }
        Ok(id)
    }

    /// Add a transform from frame `a` to frame `b`
    ///
    /// Fails if the edge would break the tree: an edge into the world frame,
    /// a second parent for a frame which has children, children for a leaf
    /// with several tools, or a cycle. Several transforms may end at the
    /// same leaf, they become tools of that leaf.
    pub fn add_transform(
        &mut self,
        transform: Transform<T>,
        a: FrameId,
        b: FrameId,
    ) -> Result<TransformId, Error> {
        if !self.graph.contains_vertex(a) || !self.graph.contains_vertex(b) {
            return Err(Error::FrameNotFoundError);
        }
        if self.root == Some(b) {
            return Err(self.not_tree_error(b, "the world frame cannot have a parent"));
        }
        if self.graph.in_degree(b) > 0 && self.graph.out_degree(b) > 0 {
            return Err(self.not_tree_error(b, "frame already has a parent"));
        }
        if self.graph.in_degree(a) > 1 {
            return Err(self.not_tree_error(a, "frame with several tools cannot have children"));
        }
        if Ancestors::new(&self.graph, a).any(|frame| frame == b) {
            return Err(self.not_tree_error(b, "transform would close a cycle"));
        }
        Ok(self.graph.add_edge(a, b, transform))
    }

    /// Remove a frame and every transform touching it
    pub fn remove_frame(&mut self, id: FrameId) -> Result<Frame<T>, Error> {
        let frame = self
            .graph
            .remove_vertex(id)
            .ok_or(Error::FrameNotFoundError)?;
        if self.root == Some(id) {
            self.root = None;
        }
        Ok(frame)
    }

    pub fn remove_transform(&mut self, id: TransformId) -> Result<Transform<T>, Error> {
        self.graph
            .remove_edge(id)
            .ok_or(Error::TransformNotFoundError)
    }

    fn not_tree_error(&self, frame: FrameId, message: &str) -> Error {
        Error::NotTreeError {
            frame: self.graph[frame].name.clone(),
            message: message.to_owned(),
        }
    }

    /// Rebuild the cached sequences and reset the coordinate mapping
    ///
    /// The gamma matrices become identities and the home position zero,
    /// discarding a custom mapping. Use `update_topology()` to keep it.
    pub fn update(&mut self) -> Result<(), Error> {
        let custom = self.has_custom_mapping();
        self.rebuild()?;
        if custom {
            warn!(
                "model {}: update() resets the custom gamma matrices and home position",
                self.name
            );
        }
        let dof = self.dof();
        let dof_position = self.dof_position();
        self.gamma_position = DMatrix::identity(dof_position, dof_position);
        self.inv_gamma_position = DMatrix::identity(dof_position, dof_position);
        self.gamma_velocity = DMatrix::identity(dof, dof);
        self.inv_gamma_velocity = DMatrix::identity(dof, dof);
        self.home_position = DVector::zeros(dof_position);
        Ok(())
    }

    /// Rebuild the cached sequences, keeping the gamma matrices and home
    /// position
    ///
    /// Fails if the new joint layout does not fit them. Call `update()` in
    /// that case.
    pub fn update_topology(&mut self) -> Result<(), Error> {
        self.rebuild()?;
        check_size(self.gamma_position.nrows(), self.dof_position())?;
        check_size(self.gamma_velocity.nrows(), self.dof())?;
        check_size(self.home_position.len(), self.dof_position())
    }

    fn has_custom_mapping(&self) -> bool {
        let is_identity = |m: &DMatrix<T>| {
            m.is_square() && *m == DMatrix::identity(m.nrows(), m.ncols())
        };
        !is_identity(&self.gamma_position)
            || !is_identity(&self.gamma_velocity)
            || self.home_position.iter().any(|&v| v != T::zero())
    }

    fn rebuild(&mut self) -> Result<(), Error> {
        self.clear_sequences();
        let root = self.root.ok_or(Error::NoWorldError)?;
        let result = self.traverse(root);
        if result.is_err() {
            self.clear_sequences();
        }
        result
    }

    fn clear_sequences(&mut self) {
        self.elements.clear();
        self.frames.clear();
        self.bodies.clear();
        self.joints.clear();
        self.transforms.clear();
        self.leaves.clear();
        self.tools.clear();
    }

    fn traverse(&mut self, root: FrameId) -> Result<(), Error> {
        let order = Descendants::new(&self.graph, root).collect::<Vec<_>>();
        let mut visited = HashSet::new();
        for element in order {
            match element {
                Element::Frame(frame) => {
                    let is_leaf = self.graph.out_degree(frame) == 0;
                    if !visited.insert(frame) {
                        if is_leaf {
                            // a leaf reached by another tool
                            continue;
                        }
                        return Err(self.not_tree_error(frame, "frame is reached on two paths"));
                    }
                    self.elements.push(element);
                    self.frames.push(frame);
                    if self.graph[frame].as_body().is_some() {
                        self.bodies.push(frame);
                    }
                    if is_leaf {
                        self.leaves.push(frame);
                    }
                }
                Element::Transform(id) => {
                    let (input, output) = self
                        .graph
                        .endpoints(id)
                        .ok_or(Error::TransformNotFoundError)?;
                    self.elements.push(element);
                    self.transforms.push(id);
                    let transform = &mut self.graph[id];
                    transform.set_frames(input, output);
                    if transform.is_joint() {
                        self.joints.push(id);
                    }
                }
            }
        }
        // transforms from frames the root cannot reach are not tools
        let traversed = self.transforms.iter().copied().collect::<HashSet<_>>();
        for &leaf in &self.leaves {
            self.tools.extend(
                self.graph
                    .in_edges(leaf)
                    .into_iter()
                    .filter(|id| traversed.contains(id)),
            );
        }
        debug!(
            frames = self.frames.len(),
            bodies = self.bodies.len(),
            joints = self.joints.len(),
            dof = self.dof(),
            leaves = self.leaves.len(),
            "model {} updated",
            self.name
        );
        Ok(())
    }
}

impl<T> Model<T>
where
    T: RealField,
{
    /// Underlying graph, for read only queries
    pub fn graph(&self) -> &KinematicGraph<T> {
        &self.graph
    }
    /// The world frame, if one was added
    pub fn root(&self) -> Option<FrameId> {
        self.root
    }

    /// Frames and transforms in depth-first order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
    pub fn frames(&self) -> &[FrameId] {
        &self.frames
    }
    pub fn bodies(&self) -> &[FrameId] {
        &self.bodies
    }
    pub fn joints(&self) -> &[TransformId] {
        &self.joints
    }
    pub fn transforms(&self) -> &[TransformId] {
        &self.transforms
    }
    /// Frames without outgoing transforms
    pub fn leaves(&self) -> &[FrameId] {
        &self.leaves
    }
    /// Traversed transforms ending at a leaf
    pub fn tools(&self) -> &[TransformId] {
        &self.tools
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }
    pub fn num_bodies(&self) -> usize {
        self.bodies.len()
    }
    pub fn num_joints(&self) -> usize {
        self.joints.len()
    }
    pub fn num_transforms(&self) -> usize {
        self.transforms.len()
    }

    pub fn frame(&self, id: FrameId) -> Option<&Frame<T>> {
        self.graph.frame(id)
    }
    pub fn frame_mut(&mut self, id: FrameId) -> Option<&mut Frame<T>> {
        self.graph.frame_mut(id)
    }
    pub fn transform(&self, id: TransformId) -> Option<&Transform<T>> {
        self.graph.transform(id)
    }
    pub fn transform_mut(&mut self, id: TransformId) -> Option<&mut Transform<T>> {
        self.graph.transform_mut(id)
    }

    /// Joint `i` in traversal order
    ///
    /// # Panics
    ///
    /// If `i >= num_joints()`.
    pub fn joint(&self, i: usize) -> &Joint<T> {
        assert!(i < self.joints.len(), "joint index {} out of range", i);
        self.graph[self.joints[i]]
            .as_joint()
            .expect("joint sequence holds joints only")
    }
    pub fn joint_mut(&mut self, i: usize) -> &mut Joint<T> {
        assert!(i < self.joints.len(), "joint index {} out of range", i);
        self.graph[self.joints[i]]
            .as_joint_mut()
            .expect("joint sequence holds joints only")
    }

    /// Frame of body `i` in traversal order
    pub fn body(&self, i: usize) -> &Frame<T> {
        assert!(i < self.bodies.len(), "body index {} out of range", i);
        &self.graph[self.bodies[i]]
    }
    pub fn body_mut(&mut self, i: usize) -> &mut Frame<T> {
        assert!(i < self.bodies.len(), "body index {} out of range", i);
        &mut self.graph[self.bodies[i]]
    }

    pub(crate) fn joint_iter(&self) -> impl Iterator<Item = &Joint<T>> {
        self.joints
            .iter()
            .filter_map(move |&id| self.graph.transform(id).and_then(Transform::as_joint))
    }

    /// Sum of the velocity dimensions of all joints
    pub fn dof(&self) -> usize {
        self.joint_iter().map(|joint| joint.joint_type.dof()).sum()
    }
    /// Sum of the position dimensions of all joints
    pub fn dof_position(&self) -> usize {
        self.joint_iter()
            .map(|joint| joint.joint_type.dof_position())
            .sum()
    }
    /// Number of leaves
    pub fn operational_dof(&self) -> usize {
        self.leaves.len()
    }
}

impl<T: RealField> Display for Model<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut levels = HashMap::new();
        for element in &self.elements {
            match *element {
                Element::Frame(id) => {
                    if let Some(frame) = self.graph.frame(id) {
                        let level = levels.get(&id).copied().unwrap_or(0);
                        writeln!(f, "{}{}", "    ".repeat(level), frame)?;
                    }
                }
                Element::Transform(id) => {
                    if let Some(transform) = self.graph.transform(id) {
                        let level = transform
                            .input()
                            .and_then(|input| levels.get(&input).copied())
                            .unwrap_or(0)
                            + 1;
                        writeln!(f, "{}{}", "    ".repeat(level), transform)?;
                        if let Some(output) = transform.output() {
                            levels.insert(output, level + 1);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::{JointBuilder, JointType};
    use na::{Isometry3, Vector3};

    fn revolute(name: &str) -> Transform<f64> {
        JointBuilder::new()
            .joint_type(JointType::Revolute {
                axis: Vector3::z_axis(),
            })
            .into_transform(name)
    }

    #[test]
    fn test_update_requires_world() {
        let mut model = Model::<f64>::with_seed(1);
        model.add_frame(Frame::new("a")).unwrap();
        assert!(matches!(model.update(), Err(Error::NoWorldError)));
    }

    #[test]
    fn test_multiple_worlds() {
        let mut model = Model::<f64>::with_seed(1);
        let world = model.add_frame(Frame::world("world")).unwrap();
        assert!(matches!(
            model.add_frame(Frame::world("other")),
            Err(Error::MultipleWorldsError { .. })
        ));
        assert_eq!(model.root(), Some(world));
        model.remove_frame(world).unwrap();
        assert_eq!(model.root(), None);
        assert!(model.add_frame(Frame::world("other")).is_ok());
    }

    #[test]
    fn test_traversal_order() {
        let mut model = Model::<f64>::with_seed(1);
        let world = model.add_frame(Frame::world("world")).unwrap();
        let base = model.add_frame(Frame::body("base")).unwrap();
        let left = model.add_frame(Frame::body("left")).unwrap();
        let right = model.add_frame(Frame::new("right")).unwrap();
        let fixed = model
            .add_transform(Transform::fixed("fixed", Isometry3::identity()), world, base)
            .unwrap();
        let j1 = model.add_transform(revolute("j1"), base, left).unwrap();
        let j2 = model.add_transform(revolute("j2"), base, right).unwrap();
        model.update().unwrap();

        assert_eq!(model.frames(), &[world, base, left, right]);
        assert_eq!(model.bodies(), &[base, left]);
        assert_eq!(model.transforms(), &[fixed, j1, j2]);
        assert_eq!(model.joints(), &[j1, j2]);
        assert_eq!(model.leaves(), &[left, right]);
        assert_eq!(model.tools(), &[j1, j2]);
        assert_eq!(model.elements().len(), 7);
        assert_eq!(model.transform(j2).unwrap().input(), Some(base));
        assert_eq!(model.transform(j2).unwrap().output(), Some(right));
        assert_eq!(model.joint(1).joint_type.dof(), 1);
        assert_eq!(model.body(1).name, "left");

        // stable across repeated updates
        let elements = model.elements().to_vec();
        model.update().unwrap();
        assert_eq!(model.elements(), elements.as_slice());

        let text = format!("{}", model);
        assert!(text.starts_with("<world>\n    fixed [⚓]\n        /base/\n"));
        assert!(text.contains("            j1 [⚙+Z]\n                /left/\n"));
    }

    #[test]
    fn test_update_topology_keeps_mapping() {
        let mut model = Model::<f64>::with_seed(1);
        let world = model.add_frame(Frame::world("world")).unwrap();
        let link = model.add_frame(Frame::body("link")).unwrap();
        let tcp = model.add_frame(Frame::new("tcp")).unwrap();
        model.add_transform(revolute("j"), world, link).unwrap();
        model.update().unwrap();
        model.set_home_position(&[0.3]).unwrap();

        model
            .add_transform(Transform::fixed("tcp", Isometry3::identity()), link, tcp)
            .unwrap();
        model.update_topology().unwrap();
        assert_eq!(model.leaves(), &[tcp]);
        assert_eq!(model.home_position()[0], 0.3);

        let extra = model.add_frame(Frame::body("extra")).unwrap();
        model.add_transform(revolute("j2"), tcp, extra).unwrap();
        assert!(matches!(
            model.update_topology(),
            Err(Error::SizeMismatchError { .. })
        ));
        model.update().unwrap();
        assert_eq!(model.home_position().len(), 2);
        assert_eq!(model.home_position()[0], 0.0);
    }

    #[test]
    fn test_tools_from_unreachable_frame() {
        let mut model = Model::<f64>::with_seed(1);
        let world = model.add_frame(Frame::world("world")).unwrap();
        let tcp = model.add_frame(Frame::new("tcp")).unwrap();
        let floating = model.add_frame(Frame::body("floating")).unwrap();
        let mount = model
            .add_transform(Transform::fixed("mount", Isometry3::identity()), world, tcp)
            .unwrap();
        let detached = model.add_transform(revolute("detached"), floating, tcp).unwrap();
        model.update().unwrap();

        assert_eq!(model.leaves(), &[tcp]);
        assert_eq!(model.tools(), &[mount]);
        assert_eq!(model.transforms(), &[mount]);
        assert!(model.joints().is_empty());
        assert_eq!(model.transform(detached).unwrap().input(), None);
    }
}
