use reef_patrol::assets::AssetManager;
use reef_patrol::ecs::{AnimationClips, EcsWorld, ModelRef, PathFollower, SwimSpeed, Transform3D};
use reef_patrol::events::GameEvent;
use reef_patrol::scene::{Scene, SceneEntity, Transform3DData, Vec3Data};

fn patrol_assets() -> AssetManager {
    let mut assets = AssetManager::new();
    assets.register_model("shark", &[("swim", 1.2)]);
    assets.register_model("underwater", &[]);
    assets
}

#[test]
fn built_in_scene_matches_the_authored_content() {
    let scene = Scene::shark_patrol(25);
    assert_eq!(scene.metadata.name.as_deref(), Some("shark_patrol"));
    assert_eq!(scene.paths.len(), 1);
    let path = &scene.paths[0];
    assert_eq!(path.samples, 25);
    assert_eq!(path.control_points.len(), 4);
    assert_eq!(
        (path.control_points[0].x, path.control_points[0].y, path.control_points[0].z),
        (4.0, 2.0, 3.0)
    );

    assert_eq!(scene.entities.len(), 2);
    let shark = &scene.entities[0];
    assert_eq!(shark.name.as_deref(), Some("shark"));
    let animation = shark.animation.as_ref().expect("shark swims");
    assert_eq!(animation.clip, "swim");
    assert_eq!(animation.speed, 0.5);
    assert_eq!(animation.weight, 0.5);
    assert!(scene.entities[1].patrol.is_none());
}

#[test]
fn scene_survives_a_json_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("scene.json");

    let scene = Scene::shark_patrol(25);
    scene.save_to_path(&path).expect("save scene");
    let loaded = Scene::load_from_path(&path).expect("load scene");

    assert_eq!(loaded.metadata.name, scene.metadata.name);
    assert_eq!(loaded.paths.len(), scene.paths.len());
    assert_eq!(loaded.entities.len(), scene.entities.len());
    assert_eq!(loaded.dependencies.models.len(), 2);
    assert_eq!(loaded.dependencies.models[0].key(), "shark");
    assert_eq!(loaded.dependencies.models[0].path(), Some("models/shark.gltf"));
    let shark = &loaded.entities[0];
    assert_eq!(shark.patrol.as_ref().map(|p| p.path.as_str()), Some("patrol"));
    assert_eq!(shark.transform.scale.x, 0.5);
}

#[test]
fn spawning_the_scene_attaches_the_patrol_components() {
    let mut ecs = EcsWorld::new();
    let spawned =
        ecs.spawn_scene(&Scene::shark_patrol(25), &patrol_assets()).expect("spawn scene");
    assert_eq!(spawned.len(), 2);
    assert_eq!(ecs.entity_count(), 2);

    let shark = spawned[0];
    let follower = ecs.world.get::<PathFollower>(shark).expect("shark patrols");
    assert_eq!(follower.path.len(), 26);
    assert_eq!((follower.origin, follower.target), (0, 1));
    assert_eq!(ecs.world.get::<SwimSpeed>(shark).expect("shark has speed").value, 0.5);
    let clips = ecs.world.get::<AnimationClips>(shark).expect("shark has clips");
    let swim = clips.clip("swim").expect("swim clip");
    assert!(swim.playing);
    assert_eq!(swim.speed, 0.5);
    assert_eq!(swim.weight, 0.5);
    let transform = ecs.world.get::<Transform3D>(shark).expect("shark transform");
    assert_eq!(transform.translation, glam::Vec3::new(1.0, 0.0, 1.0));

    let seabed = spawned[1];
    assert!(ecs.world.get::<PathFollower>(seabed).is_none());
    assert!(ecs.world.get::<ModelRef>(seabed).is_some());

    let events = ecs.drain_events();
    assert!(matches!(events[0], GameEvent::SceneSpawned { entities: 2 }));
}

#[test]
fn spawning_rejects_dangling_references() {
    let scene = Scene::shark_patrol(25);

    let mut ecs = EcsWorld::new();
    let err = ecs.spawn_scene(&scene, &AssetManager::new()).unwrap_err();
    assert!(err.to_string().contains("unknown model"), "got: {err}");

    let mut assets = patrol_assets();
    let mut broken = scene.clone();
    broken.entities[0].patrol.as_mut().unwrap().path = "nowhere".to_string();
    let err = EcsWorld::new().spawn_scene(&broken, &assets).unwrap_err();
    assert!(err.to_string().contains("unknown path"), "got: {err}");

    assets.register_model("shark", &[("bite", 0.6)]);
    let err = EcsWorld::new().spawn_scene(&scene, &assets).unwrap_err();
    assert!(err.to_string().contains("missing from model"), "got: {err}");
}

#[test]
fn omitted_transform_fields_fall_back_to_identity() {
    let json = r#"{
        "transform": { "translation": { "x": 2.0, "y": 0.0, "z": 2.0 } }
    }"#;
    let entity: SceneEntity = serde_json::from_str(json).expect("parse entity");
    let transform = Transform3D::from(&entity.transform);
    assert_eq!(transform.scale, glam::Vec3::ONE);
    assert_eq!(transform.rotation, glam::Quat::IDENTITY);

    let data = Transform3DData::from(&transform);
    assert_eq!(data.scale.x, 1.0);
    let _: Vec3Data = glam::Vec3::ZERO.into();
}
