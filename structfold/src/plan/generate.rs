//! Recursive merge-plan generation.
//!
//! The generator dispatches on the [`Kind`] of the current descriptor and
//! returns either a node in the plan arena or `None`, the empty plan.
//! Empty plans propagate: a composite whose every child yields empty
//! yields empty, and the parent prunes it.

use std::array;
use std::collections::HashMap;

use crate::error::{MergeError, MergeResult};
use crate::shape::{Field, Kind, Prim, Shape, ShapeId};
use crate::skip::{self, Partition, SkipPath};

use super::{ElemPlan, NodeId, Plan, PlanNode, PrimGroup};

pub(crate) struct Generator {
    plan: Plan,
    /// Aggregates reached with no residual skips, keyed by descriptor
    /// identity. An entry holds the shared node, `None` once the
    /// aggregate is known to produce an empty plan. Entries are inserted
    /// before descending so recurrences bind to the slot while it is
    /// still being filled.
    bound: HashMap<ShapeId, Option<NodeId>>,
    merge_maps: bool,
}

impl Generator {
    pub(crate) fn new(merge_maps: bool) -> Self {
        Self {
            plan: Plan::default(),
            bound: HashMap::new(),
            merge_maps,
        }
    }

    pub(crate) fn finish(self) -> Plan {
        self.plan
    }

    /// Generates the plan for `shape`, carrying the residual skip paths
    /// inherited from the enclosing aggregate.
    pub(crate) fn generate(
        &mut self,
        shape: &'static Shape,
        skips: Vec<SkipPath>,
    ) -> MergeResult<Option<NodeId>> {
        if let Some(path) = skips.first() {
            // Skips only make sense on kinds that can contain aggregates.
            if !matches!(
                shape.kind(),
                Kind::Pointer { .. } | Kind::Array { .. } | Kind::Sequence { .. } | Kind::Aggregate { .. }
            ) {
                return Err(MergeError::SkipKindMismatch {
                    path: path.origin().to_owned(),
                    type_name: shape.name(),
                });
            }
        }

        match shape.kind() {
            Kind::Unsupported { kind } => Err(MergeError::UnmergeableKind {
                kind: *kind,
                type_name: shape.name(),
            }),
            Kind::Prim(prim) => Ok(Some(self.plan.push(PlanNode::Prim(*prim)))),
            Kind::Pointer { elem, ops } => {
                let Some(target) = self.generate(elem(), skips)? else {
                    return Ok(None);
                };
                Ok(Some(self.plan.push(PlanNode::Pointer { ops: *ops, target })))
            }
            Kind::Array { elem, len } => {
                let elem_shape = elem();
                let Some(elem) = self.element(elem_shape, skips)? else {
                    return Ok(None);
                };
                Ok(Some(self.plan.push(PlanNode::Array {
                    len: *len,
                    stride: elem_shape.size(),
                    elem,
                })))
            }
            Kind::Sequence { elem, ops } => {
                let elem_shape = elem();
                let Some(elem) = self.element(elem_shape, skips)? else {
                    return Ok(None);
                };
                Ok(Some(self.plan.push(PlanNode::Sequence {
                    ops: *ops,
                    stride: elem_shape.size(),
                    elem,
                })))
            }
            Kind::Aggregate { fields } => self.aggregate(shape, fields, skips),
            Kind::Map { value, ops } => {
                if !self.merge_maps {
                    return Err(MergeError::MapsDisabled {
                        type_name: shape.name(),
                    });
                }
                let value = self.element(value(), Vec::new())?;
                Ok(Some(self.plan.push(PlanNode::Map { ops: *ops, value })))
            }
        }
    }

    /// Element plan for arrays, sequences, and map values: primitives
    /// run their combiner without an arena node.
    fn element(
        &mut self,
        shape: &'static Shape,
        skips: Vec<SkipPath>,
    ) -> MergeResult<Option<ElemPlan>> {
        if let Kind::Prim(prim) = shape.kind() {
            if let Some(path) = skips.into_iter().next() {
                return Err(MergeError::SkipKindMismatch {
                    path: path.into_origin(),
                    type_name: shape.name(),
                });
            }
            return Ok(Some(ElemPlan::Prim(*prim)));
        }
        Ok(self.generate(shape, skips)?.map(ElemPlan::Node))
    }

    fn aggregate(
        &mut self,
        shape: &'static Shape,
        fields: &[Field],
        skips: Vec<SkipPath>,
    ) -> MergeResult<Option<NodeId>> {
        if skips.is_empty() {
            // Recursive bind: reserve a slot up front so recurrences
            // through this aggregate alias one shared node.
            if let Some(bound) = self.bound.get(&shape.id()) {
                return Ok(*bound);
            }
            let slot = self.plan.reserve();
            self.bound.insert(shape.id(), Some(slot));
            match self.fields(fields, Partition::default())? {
                Some(node) => {
                    self.plan.fill(slot, node);
                    Ok(Some(slot))
                }
                None => {
                    self.bound.insert(shape.id(), None);
                    Ok(None)
                }
            }
        } else {
            // Skip-bearing descents rebuild per occurrence; the residual
            // set shrinks at every forwarded level, so this terminates.
            match self.fields(fields, skip::partition(skips))? {
                Some(node) => Ok(Some(self.plan.push(node))),
                None => Ok(None),
            }
        }
    }

    fn fields(&mut self, fields: &[Field], part: Partition) -> MergeResult<Option<PlanNode>> {
        let Partition {
            mut drop,
            mut forward,
        } = part;

        let mut offsets: [Vec<usize>; Prim::COUNT] = array::from_fn(|_| Vec::new());
        let mut children = Vec::new();
        let mut added = 0usize;

        for field in fields {
            if drop.remove(field.name()).is_some() {
                continue;
            }
            let shape = field.shape();
            if let Kind::Prim(prim) = shape.kind() {
                if let Some(paths) = forward.remove(field.name()) {
                    let path = paths
                        .into_iter()
                        .next()
                        .expect("forwarded skip groups are never empty");
                    return Err(MergeError::SkipKindMismatch {
                        path: path.into_origin(),
                        type_name: shape.name(),
                    });
                }
                offsets[prim.index()].push(field.offset());
                added += 1;
                continue;
            }
            let residual = forward.remove(field.name()).unwrap_or_default();
            if let Some(child) = self.generate(shape, residual)? {
                children.push((field.offset(), child));
                added += 1;
            }
        }

        // Every configured skip must have been consumed by now.
        if let Some((_, origin)) = drop.into_iter().next() {
            return Err(MergeError::SkipNotFound { path: origin });
        }
        if let Some((_, paths)) = forward.into_iter().next() {
            let path = paths
                .into_iter()
                .next()
                .expect("forwarded skip groups are never empty");
            return Err(MergeError::SkipNotFound {
                path: path.into_origin(),
            });
        }

        if added == 0 {
            return Ok(None);
        }

        let groups = offsets
            .into_iter()
            .enumerate()
            .filter(|(_, offsets)| !offsets.is_empty())
            .map(|(index, offsets)| PrimGroup {
                prim: Prim::ALL[index],
                offsets: offsets.into_boxed_slice(),
            })
            .collect();

        Ok(Some(PlanNode::Aggregate {
            groups,
            children: children.into_boxed_slice(),
        }))
    }
}
