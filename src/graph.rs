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
//! Directed graph of frames connected by transforms
use crate::frame::Frame;
use crate::transform::Transform;
use na::RealField;
use nalgebra as na;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::ops::{Index, IndexMut};

/// Stable handle of a frame, valid until the frame is removed
pub type FrameId = NodeIndex;
/// Stable handle of a transform, valid until the transform is removed
pub type TransformId = EdgeIndex;

/// Frame or transform, in the order visited by a depth-first traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Frame(FrameId),
    Transform(TransformId),
}

/// Graph with frames as vertices and transforms as edges
///
/// Handles stay valid while other vertices and edges are removed.
#[derive(Debug, Clone)]
pub struct KinematicGraph<T: RealField> {
    graph: StableDiGraph<Frame<T>, Transform<T>>,
}

impl<T: RealField> Default for KinematicGraph<T> {
    fn default() -> Self {
        Self {
            graph: StableDiGraph::new(),
        }
    }
}

impl<T: RealField> KinematicGraph<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `frame` and record its handle in it
    pub fn add_vertex(&mut self, frame: Frame<T>) -> FrameId {
        let id = self.graph.add_node(frame);
        self.graph[id].set_id(Some(id));
        id
    }

    /// Add `transform` from `a` to `b` and record its handle in it
    ///
    /// # Panics
    ///
    /// If `a` or `b` is not in the graph.
    pub fn add_edge(&mut self, a: FrameId, b: FrameId, transform: Transform<T>) -> TransformId {
        let id = self.graph.add_edge(a, b, transform);
        self.graph[id].set_id(Some(id));
        id
    }

    /// Remove `id` together with every transform touching it
    pub fn remove_vertex(&mut self, id: FrameId) -> Option<Frame<T>> {
        if !self.contains_vertex(id) {
            return None;
        }
        let incident = self
            .graph
            .edges_directed(id, Direction::Outgoing)
            .chain(self.graph.edges_directed(id, Direction::Incoming))
            .map(|edge| edge.id())
            .collect::<Vec<_>>();
        for edge in incident {
            self.remove_edge(edge);
        }
        let mut frame = self.graph.remove_node(id)?;
        frame.set_id(None);
        Some(frame)
    }

    pub fn remove_edge(&mut self, id: TransformId) -> Option<Transform<T>> {
        let mut transform = self.graph.remove_edge(id)?;
        transform.set_id(None);
        Some(transform)
    }

    #[inline]
    pub fn contains_vertex(&self, id: FrameId) -> bool {
        self.graph.contains_node(id)
    }

    #[inline]
    pub fn contains_edge(&self, id: TransformId) -> bool {
        self.graph.edge_weight(id).is_some()
    }

    pub fn frame(&self, id: FrameId) -> Option<&Frame<T>> {
        self.graph.node_weight(id)
    }

    pub fn frame_mut(&mut self, id: FrameId) -> Option<&mut Frame<T>> {
        self.graph.node_weight_mut(id)
    }

    pub fn transform(&self, id: TransformId) -> Option<&Transform<T>> {
        self.graph.edge_weight(id)
    }

    pub fn transform_mut(&mut self, id: TransformId) -> Option<&mut Transform<T>> {
        self.graph.edge_weight_mut(id)
    }

    /// `(input, output)` frames of `id`
    pub fn endpoints(&self, id: TransformId) -> Option<(FrameId, FrameId)> {
        self.graph.edge_endpoints(id)
    }

    /// Transforms leaving `id` in insertion order
    pub fn out_edges(&self, id: FrameId) -> Vec<TransformId> {
        self.edges(id, Direction::Outgoing)
    }

    /// Transforms entering `id` in insertion order
    pub fn in_edges(&self, id: FrameId) -> Vec<TransformId> {
        self.edges(id, Direction::Incoming)
    }

    fn edges(&self, id: FrameId, direction: Direction) -> Vec<TransformId> {
        // petgraph lists the newest edge first
        let mut edges = self
            .graph
            .edges_directed(id, direction)
            .map(|edge| edge.id())
            .collect::<Vec<_>>();
        edges.reverse();
        edges
    }

    pub fn out_degree(&self, id: FrameId) -> usize {
        self.graph.edges_directed(id, Direction::Outgoing).count()
    }

    pub fn in_degree(&self, id: FrameId) -> usize {
        self.graph.edges_directed(id, Direction::Incoming).count()
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.graph.node_count()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }
}

impl<T: RealField> Index<FrameId> for KinematicGraph<T> {
    type Output = Frame<T>;
    fn index(&self, id: FrameId) -> &Frame<T> {
        &self.graph[id]
    }
}

impl<T: RealField> IndexMut<FrameId> for KinematicGraph<T> {
    fn index_mut(&mut self, id: FrameId) -> &mut Frame<T> {
        &mut self.graph[id]
    }
}

impl<T: RealField> Index<TransformId> for KinematicGraph<T> {
    type Output = Transform<T>;
    fn index(&self, id: TransformId) -> &Transform<T> {
        &self.graph[id]
    }
}

impl<T: RealField> IndexMut<TransformId> for KinematicGraph<T> {
    fn index_mut(&mut self, id: TransformId) -> &mut Transform<T> {
        &mut self.graph[id]
    }
}
