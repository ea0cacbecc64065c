//! Neuron module - SWC skeletons and OBJ meshes

mod batch;
mod mesh;
mod swc;

pub use batch::{fetch_many, read_obj, read_swc, read_swc_batch};
pub use mesh::{parse_obj, Mesh};
pub use swc::{parse_swc, SwcNode, TreeNeuron};
