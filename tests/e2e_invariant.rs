//! Property tests: random add/remove/lock/delete sequences never unpair an edge.

use proptest::prelude::*;
use vertex_graph::{Error, VertexArena};

const VERTICES: usize = 6;

#[derive(Debug, Clone)]
enum Op {
    Add(usize, usize, f64),
    Remove(usize, usize),
    Lock(usize),
    Unlock(usize),
    RemoveVertex(usize),
}

fn op() -> impl Strategy<Value = Op> {
    let v = 0..VERTICES;
    prop_oneof![
        4 => (v.clone(), v.clone(), 0.0f64..10.0).prop_map(|(a, b, w)| Op::Add(a, b, w)),
        3 => (v.clone(), v.clone()).prop_map(|(a, b)| Op::Remove(a, b)),
        1 => v.clone().prop_map(Op::Lock),
        2 => v.clone().prop_map(Op::Unlock),
        1 => v.prop_map(Op::RemoveVertex),
    ]
}

proptest! {
    #[test]
    fn edges_stay_paired(ops in prop::collection::vec(op(), 0..64)) {
        let mut arena: VertexArena<usize> = VertexArena::new();
        let ids: Vec<_> = (0..VERTICES).map(|k| arena.insert(k).unwrap()).collect();

        for op in ops {
            match op {
                Op::Add(a, b, w) => {
                    let (from, to) = (ids[a], ids[b]);
                    let before = arena.get(from).and_then(|v| v.weight_to(to));
                    match arena.add_connection(from, to, w) {
                        Ok(added) => {
                            prop_assert_eq!(added, before.is_none());
                            if before.is_some() {
                                prop_assert_eq!(arena.get(from).unwrap().weight_to(to), before);
                            }
                        }
                        Err(Error::LockedVertex { vertex }) => {
                            prop_assert!(vertex == from || vertex == to);
                            prop_assert!(arena.get(vertex).unwrap().is_locked());
                        }
                        Err(Error::VertexNotFound(gone)) => {
                            prop_assert!(!arena.contains(gone));
                        }
                        Err(other) => prop_assert!(false, "unexpected error: {other}"),
                    }
                }
                Op::Remove(a, b) => {
                    let (from, to) = (ids[a], ids[b]);
                    let existed = arena.get(from).is_some_and(|v| v.contains_connection_to(to));
                    match arena.disconnect(from, to) {
                        Ok(removed) => prop_assert_eq!(removed, existed),
                        Err(Error::LockedVertex { .. }) => {}
                        Err(Error::VertexNotFound(gone)) => prop_assert!(!arena.contains(gone)),
                        Err(other) => prop_assert!(false, "unexpected error: {other}"),
                    }
                }
                Op::Lock(a) => {
                    if let Err(err) = arena.lock(ids[a]) {
                        prop_assert_eq!(err, Error::VertexNotFound(ids[a]));
                    }
                }
                Op::Unlock(a) => {
                    if let Err(err) = arena.unlock(ids[a]) {
                        prop_assert_eq!(err, Error::VertexNotFound(ids[a]));
                    }
                }
                Op::RemoveVertex(a) => {
                    let id = ids[a];
                    let len = arena.len();
                    match arena.remove(id) {
                        Ok((key, _)) => {
                            prop_assert_eq!(key, a);
                            prop_assert!(!arena.contains(id));
                            prop_assert_eq!(arena.len(), len - 1);
                            for v in arena.iter() {
                                prop_assert!(!v.contains_connection_to(id));
                                prop_assert!(!v.contains_connection_from(id));
                            }
                        }
                        Err(Error::LockedVertex { vertex }) => {
                            prop_assert!(arena.contains(id));
                            prop_assert!(arena.get(vertex).unwrap().is_locked());
                        }
                        Err(Error::VertexNotFound(gone)) => {
                            prop_assert_eq!(gone, id);
                            prop_assert!(!arena.contains(id));
                        }
                        Err(other) => prop_assert!(false, "unexpected error: {other}"),
                    }
                }
            }

            prop_assert!(arena.check_invariant().is_ok());
            for v in arena.iter() {
                for to in v.outgoing_vertices() {
                    prop_assert!(arena.get(to).unwrap().contains_connection_from(v.id()));
                }
            }
        }

        let in_total: usize = arena.iter().map(|v| v.in_degree()).sum();
        prop_assert_eq!(in_total, arena.edge_count());
    }
}
