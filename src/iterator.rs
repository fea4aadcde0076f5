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
//! Iterators to iterate descendants and ancestors
use crate::graph::*;
use na::RealField;
use nalgebra as na;
use std::collections::HashSet;

#[derive(Debug)]
/// Iterator for parent frames
///
/// Follows the first incoming transform of each frame.
pub struct Ancestors<'a, T: RealField> {
    graph: &'a KinematicGraph<T>,
    parent: Option<FrameId>,
}

impl<'a, T: RealField> Ancestors<'a, T> {
    /// Start from `frame` itself
    pub fn new(graph: &'a KinematicGraph<T>, frame: FrameId) -> Self {
        Self {
            graph,
            parent: Some(frame),
        }
    }
}

impl<T: RealField> Iterator for Ancestors<'_, T> {
    type Item = FrameId;

    fn next(&mut self) -> Option<FrameId> {
        let next = self.parent?;
        self.parent = self
            .graph
            .in_edges(next)
            .first()
            .and_then(|&edge| self.graph.endpoints(edge))
            .map(|(input, _)| input);
        Some(next)
    }
}

#[derive(Debug)]
/// Depth-first iterator over frames and transforms below a frame
///
/// Each frame is followed by its outgoing transforms in insertion order, each
/// transform by its output frame. A frame reached a second time is yielded
/// again but not expanded, so the iteration ends on any graph.
pub struct Descendants<'a, T: RealField> {
    graph: &'a KinematicGraph<T>,
    stack: Vec<Element>,
    expanded: HashSet<FrameId>,
}

impl<'a, T: RealField> Descendants<'a, T> {
    pub fn new(graph: &'a KinematicGraph<T>, root: FrameId) -> Self {
        Self {
            graph,
            stack: vec![Element::Frame(root)],
            expanded: HashSet::new(),
        }
    }
}

impl<T: RealField> Iterator for Descendants<'_, T> {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        let element = self.stack.pop()?;
        match element {
            Element::Frame(frame) => {
                if self.expanded.insert(frame) {
                    self.stack.extend(
                        self.graph
                            .out_edges(frame)
                            .into_iter()
                            .rev()
                            .map(Element::Transform),
                    );
                }
            }
            Element::Transform(transform) => {
                if let Some((_, output)) = self.graph.endpoints(transform) {
                    self.stack.push(Element::Frame(output));
                }
            }
        }
        Some(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::transform::Transform;
    use na::Isometry3;

    #[test]
    fn test_depth_first_order() {
        let mut graph = KinematicGraph::<f64>::new();
        let root = graph.add_vertex(Frame::new("root"));
        let a = graph.add_vertex(Frame::new("a"));
        let b = graph.add_vertex(Frame::new("b"));
        let c = graph.add_vertex(Frame::new("c"));
        let ra = graph.add_edge(root, a, Transform::fixed("ra", Isometry3::identity()));
        let rb = graph.add_edge(root, b, Transform::fixed("rb", Isometry3::identity()));
        let ac = graph.add_edge(a, c, Transform::fixed("ac", Isometry3::identity()));
        let order = Descendants::new(&graph, root).collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![
                Element::Frame(root),
                Element::Transform(ra),
                Element::Frame(a),
                Element::Transform(ac),
                Element::Frame(c),
                Element::Transform(rb),
                Element::Frame(b),
            ]
        );
        assert_eq!(Ancestors::new(&graph, c).collect::<Vec<_>>(), vec![c, a, root]);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut graph = KinematicGraph::<f32>::new();
        let a = graph.add_vertex(Frame::new("a"));
        let b = graph.add_vertex(Frame::new("b"));
        graph.add_edge(a, b, Transform::fixed("ab", Isometry3::identity()));
        graph.add_edge(b, a, Transform::fixed("ba", Isometry3::identity()));
        assert_eq!(Descendants::new(&graph, a).count(), 5);
    }
}
