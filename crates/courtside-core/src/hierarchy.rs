//! Competition hierarchy as an arena of nodes indexed by position.
//!
//! `parent_id` links are resolved once into indices. A parent id that names
//! no known competition makes the node a root (the link is kept in
//! [`CompetitionTree::dangling`]). A cycle is rejected at build time.

use std::collections::HashMap;

use crate::{Error, Result, record::Competition};

#[derive(Debug, Clone)]
struct Node {
  competition: Competition,
  parent:      Option<usize>,
  children:    Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct CompetitionTree {
  nodes:    Vec<Node>,
  index:    HashMap<String, usize>,
  roots:    Vec<usize>,
  dangling: Vec<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
  Unvisited,
  InProgress,
  Done,
}

impl CompetitionTree {
  /// Build the tree. Later duplicates of a competition id replace earlier
  /// ones.
  pub fn build(competitions: &[Competition]) -> Result<Self> {
    let mut tree = Self::default();

    for comp in competitions {
      match tree.index.get(&comp.competition_id) {
        Some(&idx) => tree.nodes[idx].competition = comp.clone(),
        None => {
          tree.index.insert(comp.competition_id.clone(), tree.nodes.len());
          tree.nodes.push(Node {
            competition: comp.clone(),
            parent:      None,
            children:    vec![],
          });
        }
      }
    }

    for idx in 0..tree.nodes.len() {
      let parent = match tree.nodes[idx].competition.parent_id.as_deref() {
        None => None,
        Some(pid) => match tree.index.get(pid) {
          Some(&p) => Some(p),
          None => {
            tree.dangling.push(idx);
            None
          }
        },
      };
      tree.nodes[idx].parent = parent;
      match parent {
        Some(p) => tree.nodes[p].children.push(idx),
        None => tree.roots.push(idx),
      }
    }

    tree.check_acyclic()?;
    Ok(tree)
  }

  /// Walk parent links from every node; revisiting a node still on the
  /// current walk means a cycle.
  fn check_acyclic(&self) -> Result<()> {
    let mut marks = vec![Mark::Unvisited; self.nodes.len()];
    for start in 0..self.nodes.len() {
      let mut path = vec![];
      let mut cursor = Some(start);
      while let Some(idx) = cursor {
        match marks[idx] {
          Mark::Done => break,
          Mark::InProgress => {
            let id = self.nodes[idx].competition.competition_id.clone();
            return Err(Error::HierarchyCycle(id));
          }
          Mark::Unvisited => {
            marks[idx] = Mark::InProgress;
            path.push(idx);
            cursor = self.nodes[idx].parent;
          }
        }
      }
      for idx in path {
        marks[idx] = Mark::Done;
      }
    }
    Ok(())
  }

  pub fn len(&self) -> usize { self.nodes.len() }

  pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

  pub fn get(&self, id: &str) -> Option<&Competition> {
    self.index.get(id).map(|&i| &self.nodes[i].competition)
  }

  pub fn roots(&self) -> impl Iterator<Item = &Competition> {
    self.roots.iter().map(|&i| &self.nodes[i].competition)
  }

  /// Direct children of `id`, or `None` if `id` is unknown.
  pub fn children(&self, id: &str) -> Option<Vec<&Competition>> {
    let idx = *self.index.get(id)?;
    Some(
      self.nodes[idx]
        .children
        .iter()
        .map(|&c| &self.nodes[c].competition)
        .collect(),
    )
  }

  pub fn parent(&self, id: &str) -> Option<&Competition> {
    let idx = *self.index.get(id)?;
    self.nodes[idx].parent.map(|p| &self.nodes[p].competition)
  }

  /// Parent, grandparent, ... up to the root.
  pub fn ancestors(&self, id: &str) -> Vec<&Competition> {
    let mut out = vec![];
    let mut cursor = self.index.get(id).and_then(|&i| self.nodes[i].parent);
    while let Some(idx) = cursor {
      out.push(&self.nodes[idx].competition);
      cursor = self.nodes[idx].parent;
    }
    out
  }

  /// Competitions whose `parent_id` named no known competition.
  pub fn dangling(&self) -> impl Iterator<Item = &Competition> {
    self.dangling.iter().map(|&i| &self.nodes[i].competition)
  }
}
