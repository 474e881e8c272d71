//! Assembles imported meshes into model trees.
//!
//! Importers hand over one part per mesh, in file order. A mesh whose name
//! starts with [`OBJECT_PREFIX`] opens a new object, and every following mesh
//! up to the next marker belongs to it. An object made of a single mesh stays
//! a plain part; larger objects become a composite named after the object.

use log::debug;

use crate::scene_graph::model_node::ModelNode;

pub const OBJECT_PREFIX: &str = "OBJ_";

pub fn group_imported_meshes(meshes: impl IntoIterator<Item = ModelNode>) -> Vec<ModelNode> {
    let mut grouped = Vec::new();
    let mut current_name = String::new();
    let mut current_parts = Vec::new();

    for mesh in meshes {
        if let Some(object_name) = mesh.name().strip_prefix(OBJECT_PREFIX) {
            let object_name = object_name.to_string();
            merge_parts(&current_name, &mut current_parts, &mut grouped);
            current_name = object_name;
        }

        current_parts.push(mesh);
    }

    merge_parts(&current_name, &mut current_parts, &mut grouped);
    grouped
}

/// Groups the meshes and wraps the result in a single root composite.
pub fn load_model(name: impl Into<String>, meshes: impl IntoIterator<Item = ModelNode>) -> ModelNode {
    ModelNode::composite(name, group_imported_meshes(meshes))
}

fn merge_parts(name: &str, parts: &mut Vec<ModelNode>, output: &mut Vec<ModelNode>) {
    if parts.is_empty() {
        return;
    }

    debug!("Merged {} parts into model {}", parts.len(), name);
    if parts.len() == 1 {
        output.append(parts);
    } else {
        output.push(ModelNode::composite(name, std::mem::take(parts)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::AABB;
    use std::sync::{Mutex, Once};
    use crate::scene_graph::model_node::{MeshId, ModelPart};

    fn mesh(name: &str, id: u32) -> ModelNode {
        ModelNode::part(name, ModelPart::new(MeshId(id), AABB::default()))
    }

    #[test]
    fn marker_meshes_open_new_objects() {
        let grouped = group_imported_meshes([
            mesh("OBJ_Table", 0),
            mesh("Leg", 1),
            mesh("Leg", 2),
            mesh("OBJ_Lamp", 3),
            mesh("OBJ_Chair", 4),
            mesh("Seat", 5),
        ]);

        let names: Vec<_> = grouped.iter().map(ModelNode::name).collect();
        assert_eq!(names, ["Table", "OBJ_Lamp", "Chair"]);
        assert_eq!(grouped[0].leaf_count(), 3);
        assert!(grouped[1].is_leaf());
        assert_eq!(grouped[2].leaf_count(), 2);
    }

    #[test]
    fn meshes_before_first_marker_form_unnamed_object() {
        let grouped = group_imported_meshes([mesh("a", 0), mesh("b", 1), mesh("OBJ_C", 2)]);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].name(), "");
        assert_eq!(grouped[0].leaf_count(), 2);
    }

    #[test]
    fn load_model_keeps_mesh_order() {
        let model = load_model(
            "scene.obj",
            [mesh("OBJ_A", 0), mesh("a2", 1), mesh("OBJ_B", 2)],
        );

        let meshes: Vec<_> = model
            .stream_tree()
            .iter()
            .filter_map(|node| node.as_part())
            .map(|part| part.mesh().0)
            .collect();
        assert_eq!(model.name(), "scene.obj");
        assert_eq!(meshes, [0, 1, 2]);
    }

    struct CaptureLogger;

    static CAPTURED: Mutex<Vec<String>> = Mutex::new(Vec::new());
    static INSTALL: Once = Once::new();

    impl log::Log for CaptureLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut captured) = CAPTURED.lock() {
                captured.push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    fn captured_merges(model: &str) -> Vec<String> {
        let suffix = format!("into model {model}");
        CAPTURED
            .lock()
            .expect("log capture lock")
            .iter()
            .filter(|line| line.ends_with(&suffix))
            .cloned()
            .collect()
    }

    #[test]
    fn every_object_logs_its_merge() {
        INSTALL.call_once(|| {
            log::set_logger(&CaptureLogger).expect("no logger installed yet");
            log::set_max_level(log::LevelFilter::Debug);
        });

        group_imported_meshes([
            mesh("OBJ_MergeLogPair", 0),
            mesh("Leg", 1),
            mesh("OBJ_MergeLogSingle", 2),
        ]);

        assert_eq!(
            captured_merges("MergeLogPair"),
            ["Merged 2 parts into model MergeLogPair"]
        );
        assert_eq!(
            captured_merges("MergeLogSingle"),
            ["Merged 1 parts into model MergeLogSingle"]
        );
    }

    #[test]
    fn no_meshes_yield_nothing() {
        assert!(group_imported_meshes(std::iter::empty()).is_empty());
        assert_eq!(load_model("empty", std::iter::empty()).leaf_count(), 0);
    }
}
