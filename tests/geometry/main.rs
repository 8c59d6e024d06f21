#[macro_use]
extern crate approx;

mod ball_ball;
mod box_plane;
mod capsule_capsule;
mod invariants;
mod octree_queries;
