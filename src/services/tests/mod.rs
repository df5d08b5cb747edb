use super::per_vertex::{get_per_vertex, PreviousWeights, SetCommandPhase, SetPerVertexCommand};
use super::resolver::NodeResolver;
use crate::error::{CommandError, SceneError};
use crate::history::{UndoQueue, UndoableCommand};
use crate::models::per_vertex::{GetPerVertexArgs, PerVertexAttribute, SetPerVertexArgs};
use crate::models::scene::{NodeId, NodeKind, INPUT_MESH_ATTRIBUTE, WORLD_MESH_ATTRIBUTE};
use crate::scene::{AttributeStore, Scene};

    /// pCube1 -> pCubeShape1 --worldMesh[0]--> nClothShape1, with pCube1 selected
    fn cloth_scene() -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::new();
        let (transform, shape) = scene
            .add_transform_with_shape("pCube1", "pCubeShape1", NodeKind::Shape)
            .expect("cube");
        let (_, cloth) = scene
            .add_transform_with_shape("nCloth1", "nClothShape1", NodeKind::NCloth)
            .expect("cloth");
        scene
            .connect(shape, WORLD_MESH_ATTRIBUTE, 0, cloth, INPUT_MESH_ATTRIBUTE)
            .expect("connect");
        scene.select(&[transform]).expect("select");
        (scene, transform, cloth)
    }

    fn get(scene: &Scene, plug: &str) -> Result<Vec<f64>, CommandError> {
        get_per_vertex(
            scene,
            &NodeResolver::default(),
            &GetPerVertexArgs {
                target: None,
                plug_name: Some(plug.to_string()),
            },
        )
    }

    fn set_args(plug: &str, weights: &[f64]) -> SetPerVertexArgs {
        SetPerVertexArgs {
            target: None,
            plug_name: Some(plug.to_string()),
            vertex_weights: Some(weights.to_vec()),
        }
    }

    fn invoke(scene: &mut Scene, plug: &str, weights: &[f64]) -> SetPerVertexCommand {
        let mut command =
            SetPerVertexCommand::parse(scene, &set_args(plug, weights), NodeResolver::default())
                .expect("valid arguments");
        command.do_it(scene).expect("set should apply");
        command
    }

    #[test]
    fn get_after_set_on_unset_map_returns_the_weights_for_every_plug() {
        for attribute in PerVertexAttribute::ALL {
            let (mut scene, _, _) = cloth_scene();
            let weights = [0.25, 0.5, 0.75, 1.0];
            assert_eq!(get(&scene, attribute.plug_name()).unwrap(), Vec::<f64>::new());

            let command = invoke(&mut scene, attribute.plug_name(), &weights);

            assert_eq!(command.phase(), SetCommandPhase::Applied);
            assert_eq!(command.previous(), &PreviousWeights::WasUnset);
            assert_eq!(get(&scene, attribute.plug_name()).unwrap(), weights);
        }
    }

    #[test]
    fn thickness_scenario_undo_leaves_zeroed_container() {
        let (mut scene, _, cloth) = cloth_scene();
        let mut command = invoke(&mut scene, "thicknessPerVertex", &[0.1, 0.2, 0.3]);
        assert_eq!(get(&scene, "thicknessPerVertex").unwrap(), vec![0.1, 0.2, 0.3]);

        command.undo_it(&mut scene).unwrap();

        assert_eq!(command.phase(), SetCommandPhase::Undone);
        assert_eq!(get(&scene, "thicknessPerVertex").unwrap(), vec![0.0, 0.0, 0.0]);
        assert!(scene
            .double_array(cloth, PerVertexAttribute::Thickness)
            .unwrap()
            .is_some());
    }

    #[test]
    fn undo_of_second_set_restores_the_first() {
        let (mut scene, _, _) = cloth_scene();
        invoke(&mut scene, "frictionPerVertex", &[1.0, 2.0, 3.0]);
        let mut second = invoke(&mut scene, "frictionPerVertex", &[4.0, 5.0, 6.0]);
        assert_eq!(second.previous(), &PreviousWeights::Snapshot(vec![1.0, 2.0, 3.0]));

        second.undo_it(&mut scene).unwrap();
        assert_eq!(get(&scene, "frictionPerVertex").unwrap(), vec![1.0, 2.0, 3.0]);

        second.redo_it(&mut scene).unwrap();
        assert_eq!(second.phase(), SetCommandPhase::Applied);
        assert_eq!(get(&scene, "frictionPerVertex").unwrap(), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn redo_after_undo_of_created_container_reapplies_weights() {
        let (mut scene, _, _) = cloth_scene();
        let mut command = invoke(&mut scene, "bendPerVertex", &[0.5, 0.5]);
        command.undo_it(&mut scene).unwrap();
        command.redo_it(&mut scene).unwrap();

        assert_eq!(get(&scene, "bendPerVertex").unwrap(), vec![0.5, 0.5]);
        // The zeroed container existed at redo time, so it was snapshotted.
        assert_eq!(command.previous(), &PreviousWeights::Snapshot(vec![0.0, 0.0]));

        command.undo_it(&mut scene).unwrap();
        assert_eq!(get(&scene, "bendPerVertex").unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn shorter_weights_only_overwrite_the_prefix() {
        let (mut scene, _, _) = cloth_scene();
        invoke(&mut scene, "dragPerVertex", &[1.0, 1.0, 1.0, 1.0]);
        let mut command = invoke(&mut scene, "dragPerVertex", &[9.0, 8.0]);
        assert_eq!(get(&scene, "dragPerVertex").unwrap(), vec![9.0, 8.0, 1.0, 1.0]);

        command.undo_it(&mut scene).unwrap();
        assert_eq!(get(&scene, "dragPerVertex").unwrap(), vec![1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn longer_weights_do_not_grow_the_container() {
        let (mut scene, _, _) = cloth_scene();
        invoke(&mut scene, "liftPerVertex", &[1.0, 1.0]);
        invoke(&mut scene, "liftPerVertex", &[2.0, 3.0, 4.0]);
        assert_eq!(get(&scene, "liftPerVertex").unwrap(), vec![2.0, 3.0]);
    }

    #[test]
    fn invalid_or_missing_plug_name_fails_before_mutation() {
        let (scene, _, cloth) = cloth_scene();

        let err = SetPerVertexCommand::parse(
            &scene,
            &set_args("thickness", &[1.0]),
            NodeResolver::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(_)));

        let args = SetPerVertexArgs {
            plug_name: None,
            ..set_args("massPerVertex", &[1.0])
        };
        let err = SetPerVertexCommand::parse(&scene, &args, NodeResolver::default()).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(_)));

        let err = get(&scene, "notAPlug").unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(_)));

        for attribute in PerVertexAttribute::ALL {
            assert_eq!(scene.double_array(cloth, attribute).unwrap(), None);
        }
    }

    #[test]
    fn plug_name_is_checked_before_the_target() {
        let mut scene = Scene::new();
        scene.add_node("loner", NodeKind::Transform).unwrap();
        let args = GetPerVertexArgs {
            target: Some("loner".to_string()),
            plug_name: Some("bogus".to_string()),
        };
        let err = get_per_vertex(&scene, &NodeResolver::default(), &args).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(_)));
    }

    #[test]
    fn missing_weights_is_an_invalid_argument_but_empty_weights_are_fine() {
        let (mut scene, _, _) = cloth_scene();
        let args = SetPerVertexArgs {
            vertex_weights: None,
            ..set_args("massPerVertex", &[])
        };
        let err = SetPerVertexCommand::parse(&scene, &args, NodeResolver::default()).unwrap_err();
        assert_eq!(
            err,
            CommandError::InvalidArgument("vertexWeight flag must be set".to_string())
        );

        invoke(&mut scene, "massPerVertex", &[]);
        assert_eq!(get(&scene, "massPerVertex").unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn unrelated_selection_is_no_relationship_and_nothing_is_recorded() {
        let (mut scene, _, cloth) = cloth_scene();
        let (lonely, _) = scene
            .add_transform_with_shape("pSphere1", "pSphereShape1", NodeKind::Shape)
            .unwrap();
        scene.select(&[lonely]).unwrap();

        assert_eq!(get(&scene, "massPerVertex"), Err(CommandError::NoRelationship));

        let mut command = SetPerVertexCommand::parse(
            &scene,
            &set_args("massPerVertex", &[1.0]),
            NodeResolver::default(),
        )
        .unwrap();
        assert_eq!(command.do_it(&mut scene), Err(CommandError::NoRelationship));
        assert_eq!(command.phase(), SetCommandPhase::Unexecuted);
        assert_eq!(command.previous(), &PreviousWeights::NotCaptured);
        assert_eq!(scene.double_array(cloth, PerVertexAttribute::Mass).unwrap(), None);
    }

    #[test]
    fn empty_selection_and_unknown_names_are_invalid_arguments() {
        let (mut scene, _, _) = cloth_scene();
        scene.clear_selection();
        assert!(matches!(
            get(&scene, "massPerVertex"),
            Err(CommandError::InvalidArgument(_))
        ));

        let args = SetPerVertexArgs {
            target: Some("doesNotExist".to_string()),
            ..set_args("massPerVertex", &[1.0])
        };
        let err = SetPerVertexCommand::parse(&scene, &args, NodeResolver::default()).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(_)));
    }

    #[test]
    fn explicit_target_overrides_the_selection() {
        let (mut scene, _, cloth) = cloth_scene();
        scene.clear_selection();
        let args = SetPerVertexArgs {
            target: Some("nClothShape1".to_string()),
            ..set_args("wrinklePerVertex", &[0.3])
        };
        let mut command = SetPerVertexCommand::parse(&scene, &args, NodeResolver::default()).unwrap();
        command.do_it(&mut scene).unwrap();

        let stored = scene
            .double_array(cloth, PerVertexAttribute::Wrinkle)
            .unwrap()
            .unwrap();
        assert_eq!(stored.as_slice(), &[0.3]);
    }

    #[test]
    fn deleted_simulation_node_makes_undo_and_redo_fail_gracefully() {
        let (mut scene, _, cloth) = cloth_scene();
        let mut command = invoke(&mut scene, "stretchPerVertex", &[1.0]);
        command.undo_it(&mut scene).unwrap();

        scene.remove_node(cloth).unwrap();

        assert_eq!(command.redo_it(&mut scene), Err(CommandError::NoRelationship));
        assert_eq!(command.phase(), SetCommandPhase::Undone);
    }

    #[test]
    fn undo_fails_when_the_resolved_node_has_no_map() {
        let (mut scene, _, cloth) = cloth_scene();
        let shape = scene.find_by_name("pCubeShape1").unwrap();
        let mut queue: UndoQueue<Scene> = UndoQueue::new(10);
        queue.push(Box::new(invoke(&mut scene, "frictionPerVertex", &[0.4, 0.6])));

        // Rewire the cube to a fresh cloth that never had the map allocated.
        scene.remove_node(cloth).unwrap();
        let (_, replacement) = scene
            .add_transform_with_shape("nCloth2", "nClothShape2", NodeKind::NCloth)
            .unwrap();
        scene
            .connect(shape, WORLD_MESH_ATTRIBUTE, 0, replacement, INPUT_MESH_ATTRIBUTE)
            .unwrap();

        let err = queue.undo(&mut scene).unwrap_err();
        assert_eq!(
            err,
            CommandError::Scene(SceneError::MissingAttribute {
                node: "nClothShape2".to_string(),
                attribute: "frictionPerVertex".to_string(),
            })
        );
        assert_eq!(queue.undo_len(), 1);
        assert_eq!(queue.redo_len(), 0);
        assert_eq!(get(&scene, "frictionPerVertex").unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn undo_and_redo_outside_their_phase_are_no_ops() {
        let (mut scene, _, _) = cloth_scene();
        let mut command = SetPerVertexCommand::parse(
            &scene,
            &set_args("dampPerVertex", &[1.0]),
            NodeResolver::default(),
        )
        .unwrap();

        command.undo_it(&mut scene).unwrap();
        command.redo_it(&mut scene).unwrap();
        assert_eq!(command.phase(), SetCommandPhase::Unexecuted);
        assert_eq!(get(&scene, "dampPerVertex").unwrap(), Vec::<f64>::new());

        command.do_it(&mut scene).unwrap();
        command.redo_it(&mut scene).unwrap();
        assert_eq!(command.phase(), SetCommandPhase::Applied);
        assert_eq!(command.previous(), &PreviousWeights::WasUnset);
    }

    #[test]
    fn get_reads_rigid_nodes_too() {
        let mut scene = Scene::new();
        let (transform, rigid) = scene
            .add_transform_with_shape("ground", "nRigidShape1", NodeKind::NRigid)
            .unwrap();
        scene
            .set_double_array(rigid, PerVertexAttribute::Bounce, vec![0.9, 0.8].into())
            .unwrap();
        scene.select(&[transform]).unwrap();

        assert_eq!(get(&scene, "bouncePerVertex").unwrap(), vec![0.9, 0.8]);
    }
