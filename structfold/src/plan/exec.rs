//! Lockstep plan execution over raw locations.

use super::{ElemPlan, NodeId, Plan, PlanNode};

impl Plan {
    /// Merges the value at `r` into the value at `l` according to the
    /// node `id`.
    ///
    /// # Safety
    ///
    /// `l` and `r` must point to distinct, valid, properly aligned values
    /// of the type the node was generated from.
    pub(crate) unsafe fn run(&self, id: NodeId, l: *mut u8, r: *mut u8) {
        match self.node(id) {
            PlanNode::Pending => unreachable!("pending plan node survived generation"),
            PlanNode::Prim(prim) => prim.fold(l, r),
            PlanNode::Pointer { ops, target } => {
                let left_target = (ops.target)(l);
                if left_target.is_null() {
                    // Nothing on the left: install the right payload
                    // whole and leave the right slot empty.
                    (ops.take)(l, r);
                    return;
                }
                let right_target = (ops.target)(r);
                if right_target.is_null() {
                    return;
                }
                self.run(*target, left_target, right_target);
            }
            PlanNode::Array { len, stride, elem } => {
                for index in 0..*len {
                    let offset = index * stride;
                    self.run_elem(elem, l.add(offset), r.add(offset));
                }
            }
            PlanNode::Sequence { ops, stride, elem } => {
                let left_len = (ops.len)(l);
                let right_len = (ops.len)(r);
                // Normalize: the left header becomes the longer sequence,
                // and keeps the tail beyond the merged overlap.
                if right_len > left_len {
                    (ops.swap)(l, r);
                }
                let overlap = left_len.min(right_len);
                let left_data = (ops.data)(l);
                let right_data = (ops.data)(r);
                for index in 0..overlap {
                    let offset = index * stride;
                    self.run_elem(elem, left_data.add(offset), right_data.add(offset));
                }
            }
            PlanNode::Aggregate { groups, children } => {
                for group in groups.iter() {
                    for &offset in group.offsets.iter() {
                        group.prim.fold(l.add(offset), r.add(offset));
                    }
                }
                for &(offset, child) in children.iter() {
                    self.run(child, l.add(offset), r.add(offset));
                }
            }
            PlanNode::Map { ops, value } => {
                (ops.merge_into)(l, r, &mut |left_value, right_value| {
                    if let Some(value) = value {
                        // SAFETY: the map bridge hands us two valid,
                        // aligned slots of the map's value type.
                        unsafe { self.run_elem(value, left_value, right_value) };
                    }
                });
            }
        }
    }

    unsafe fn run_elem(&self, elem: &ElemPlan, l: *mut u8, r: *mut u8) {
        match elem {
            ElemPlan::Prim(prim) => prim.fold(l, r),
            ElemPlan::Node(node) => self.run(*node, l, r),
        }
    }
}
