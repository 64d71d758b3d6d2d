use std::{io::Write, path::Path};

use cgmath::{Deg, InnerSpace, Matrix4, Rad, Vector2, Vector3};
use log::{info, warn};

use crate::{
    animation::AnimationMixer,
    assets::{
        loader::{self, LoadedAsset, MeshSetup},
        source_for_path, Asset, AssetSource, LoadError, SourceError,
    },
    config::{Projection, ViewerConfig},
    export::{ExportError, SceneSnapshot},
    gfx::{
        camera::{Camera, OrbitCamera, OrthographicCamera},
        geometry::generate_plane,
        picking::{
            ObserverId, PickOutcome, PickingEngine, PointerEvent, PointerObservers,
            PointerTracker, Selection,
        },
        resources::material::{hex_to_rgb, Material, MaterialId},
        scene::{
            light::LightRig,
            Entity, EntityMeta, EntityRegistry, Object, ObjectId, Scene,
        },
    },
};

/// Name the highlight material is registered under
pub const HIGHLIGHT_MATERIAL: &str = "highlight";
/// Name the ground material is registered under
pub const GROUND_MATERIAL: &str = "ground";

/// The viewer's camera, chosen by [`Projection`]
#[derive(Debug, Clone, Copy)]
pub enum ViewCamera {
    Orthographic(OrthographicCamera),
    Perspective(OrbitCamera),
}

impl ViewCamera {
    fn from_config(config: &ViewerConfig) -> Self {
        let eye = Vector3::from(config.camera_position);
        match config.projection {
            Projection::Orthographic => ViewCamera::Orthographic(
                OrthographicCamera::new(config.camera_distance, config.aspect(), eye)
                    .with_zoom(config.camera_zoom),
            ),
            Projection::Perspective => {
                let length = eye.magnitude().max(f32::EPSILON);
                let pitch = (eye.y / length).asin();
                let yaw = eye.x.atan2(eye.z);
                let mut camera = OrbitCamera::new(
                    config.camera_distance,
                    pitch,
                    yaw,
                    Vector3::new(0.0, 0.0, 0.0),
                    config.aspect(),
                );
                camera.zfar = 200.0;
                ViewCamera::Perspective(camera)
            }
        }
    }

    pub fn eye(&self) -> Vector3<f32> {
        match self {
            ViewCamera::Orthographic(camera) => camera.eye,
            ViewCamera::Perspective(camera) => camera.eye,
        }
    }

    fn set_distance(&mut self, distance: f32) {
        match self {
            ViewCamera::Orthographic(camera) => camera.set_half_extent(distance),
            ViewCamera::Perspective(camera) => camera.set_distance(distance),
        }
    }
}

impl Camera for ViewCamera {
    fn view_matrix(&self) -> Matrix4<f32> {
        match self {
            ViewCamera::Orthographic(camera) => camera.view_matrix(),
            ViewCamera::Perspective(camera) => camera.view_matrix(),
        }
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        match self {
            ViewCamera::Orthographic(camera) => camera.projection_matrix(),
            ViewCamera::Perspective(camera) => camera.projection_matrix(),
        }
    }

    fn set_aspect(&mut self, aspect: f32) {
        match self {
            ViewCamera::Orthographic(camera) => camera.set_aspect(aspect),
            ViewCamera::Perspective(camera) => camera.set_aspect(aspect),
        }
    }

    fn orbit(&mut self, axis: Vector3<f32>, angle: Rad<f32>) {
        match self {
            ViewCamera::Orthographic(camera) => camera.orbit(axis, angle),
            ViewCamera::Perspective(camera) => camera.orbit(axis, angle),
        }
    }
}

/// Scene context of one viewer: scene graph, entity registry, selection,
/// camera, pointer state and animation mixers.
///
/// Everything happens on the caller's thread. Pointer events only record
/// the pointer position; picking runs once per [`Viewer::advance`].
pub struct Viewer {
    config: ViewerConfig,
    scene: Scene,
    registry: EntityRegistry,
    selection: Selection,
    picking: PickingEngine,
    camera: ViewCamera,
    pointer: PointerTracker,
    observers: PointerObservers,
    mixers: Vec<AnimationMixer>,
    rig: LightRig,
    ground: Option<ObjectId>,
}

impl Viewer {
    /// Sets up lights, the highlight material, the camera and (if
    /// configured) the ground plane.
    pub fn new(config: ViewerConfig) -> Self {
        let mut scene = Scene::new();
        scene.background = hex_to_rgb(config.background);
        let rig = LightRig::install(&mut scene.lights, config.ambient, config.ambient_total);

        let highlight =
            scene.add_material(Material::from_hex(HIGHLIGHT_MATERIAL, config.highlight_color));

        let mut registry = EntityRegistry::new();
        let ground = config.ground.as_ref().map(|ground| {
            let material = scene.add_material(Material::from_hex(GROUND_MATERIAL, ground.color));

            let mut plane = Object::from_geometry(
                GROUND_MATERIAL,
                &generate_plane(ground.size, ground.size, 1, 1),
            );
            plane.set_translation(Vector3::new(0.0, ground.height, 0.0));
            plane.rotate_x(Deg(-90.0));
            plane.receive_shadow = true;
            plane.set_material(material);

            // Registered so it is known, but never selectable
            let id = scene.add_object(plane);
            registry.register(Entity::new(id, EntityMeta::named(GROUND_MATERIAL)));
            id
        });

        let pointer =
            PointerTracker::new(config.surface_width as f32, config.surface_height as f32);
        let camera = ViewCamera::from_config(&config);

        info!(
            "viewer ready: {}x{} {:?}",
            config.surface_width, config.surface_height, config.projection
        );

        Self {
            config,
            scene,
            registry,
            selection: Selection::new(),
            picking: PickingEngine::new(highlight),
            camera,
            pointer,
            observers: PointerObservers::new(),
            mixers: Vec::new(),
            rig,
            ground,
        }
    }

    /// Adds a ready-made object as an entity
    pub fn add_mesh<F>(&mut self, object: Object, meta: EntityMeta, mut customize: F) -> ObjectId
    where
        F: FnMut(&mut MeshSetup<'_>),
    {
        loader::install_object(object, meta, &mut self.scene, &mut self.registry, &mut customize)
    }

    /// Loads an asset and installs its meshes.
    ///
    /// `customize` runs once per mesh before it is registered. Entities of
    /// earlier loads are untouched if this one fails.
    ///
    /// The returned future borrows the viewer until the asset is installed.
    /// To keep calling [`Viewer::advance`] while a large asset is fetched,
    /// drive [`AssetSource::load`] yourself and pass its result to
    /// [`Viewer::install`].
    pub async fn load<S, F>(
        &mut self,
        source: &S,
        path: impl AsRef<Path>,
        meta: Option<EntityMeta>,
        customize: F,
    ) -> Result<LoadedAsset, LoadError>
    where
        S: AssetSource + ?Sized,
        F: FnMut(&mut MeshSetup<'_>),
    {
        let path = path.as_ref();
        info!("loading {}", path.display());
        let fetched = source.load(path).await;
        self.install(path, fetched, meta, customize)
    }

    /// Installs the result of an [`AssetSource::load`] for `path`.
    ///
    /// A failed fetch is logged and returned as a [`LoadError`]; nothing is
    /// added to the scene in that case.
    pub fn install<F>(
        &mut self,
        path: impl AsRef<Path>,
        fetched: Result<Asset, SourceError>,
        meta: Option<EntityMeta>,
        mut customize: F,
    ) -> Result<LoadedAsset, LoadError>
    where
        F: FnMut(&mut MeshSetup<'_>),
    {
        let path = path.as_ref();
        let asset = match fetched {
            Ok(asset) => asset,
            Err(cause) => {
                warn!("failed to load {}: {}", path.display(), cause);
                return Err(LoadError {
                    path: path.to_path_buf(),
                    cause,
                });
            }
        };

        let loaded = self.install_asset(asset, meta.as_ref(), &mut customize);
        info!(
            "loaded {}: {} entities, {} animations",
            path.display(),
            loaded.entities.len(),
            loaded.animations.len()
        );
        Ok(loaded)
    }

    /// [`Viewer::load`] with the source picked from the file extension
    pub async fn load_file<F>(
        &mut self,
        path: impl AsRef<Path>,
        meta: Option<EntityMeta>,
        customize: F,
    ) -> Result<LoadedAsset, LoadError>
    where
        F: FnMut(&mut MeshSetup<'_>),
    {
        let path = path.as_ref();
        let source = source_for_path(path).map_err(|cause| LoadError {
            path: path.to_path_buf(),
            cause,
        })?;
        self.load(source.as_ref(), path, meta, customize).await
    }

    /// Runs [`Viewer::load`] to completion on the current thread
    pub fn load_blocking<S, F>(
        &mut self,
        source: &S,
        path: impl AsRef<Path>,
        meta: Option<EntityMeta>,
        customize: F,
    ) -> Result<LoadedAsset, LoadError>
    where
        S: AssetSource + ?Sized,
        F: FnMut(&mut MeshSetup<'_>),
    {
        pollster::block_on(self.load(source, path, meta, customize))
    }

    fn install_asset<F>(
        &mut self,
        asset: Asset,
        meta: Option<&EntityMeta>,
        customize: &mut F,
    ) -> LoadedAsset
    where
        F: FnMut(&mut MeshSetup<'_>),
    {
        let loaded =
            loader::install_asset(asset, meta, &mut self.scene, &mut self.registry, customize);

        if !loaded.animations.is_empty() {
            let mut mixer = AnimationMixer::new(loaded.entities.clone());
            mixer.play_all(&loaded.animations);
            self.mixers.push(mixer);
        }

        loaded
    }

    /// Unregisters an entity and removes its object from the scene.
    ///
    /// If it was selected the selection is dropped without restoring its
    /// material.
    pub fn remove_entity(&mut self, id: ObjectId) -> Option<Entity> {
        let entity = self.registry.unregister(id)?;
        self.selection.forget(id);
        self.scene.remove_object(id);
        for mixer in &mut self.mixers {
            mixer.release(id);
        }
        self.mixers.retain(|mixer| !mixer.targets().is_empty());
        if self.ground == Some(id) {
            self.ground = None;
        }
        Some(entity)
    }

    /// Records the pointer position, then notifies observers
    pub fn pointer_moved(&mut self, event: PointerEvent) {
        self.pointer.on_move(&event);
        self.observers.notify(&event, &self.selection);
    }

    pub fn on_pointer_move<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&PointerEvent, &Selection) + 'static,
    {
        self.observers.subscribe(observer)
    }

    pub fn remove_pointer_observer(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// One frame: pick under the pointer, turn the camera, advance animations.
    pub fn advance(&mut self, delta_seconds: f32) -> PickOutcome {
        let hits = self.picking.cast(&self.camera, self.pointer.ndc(), &self.scene);
        let outcome = self
            .picking
            .resolve(&hits, &self.registry, &mut self.selection, &mut self.scene);

        if self.config.rotation_speed != 0.0 {
            self.camera
                .orbit(Vector3::new(1.0, 1.0, 1.0), Rad(self.config.rotation_speed));
        }

        for mixer in &mut self.mixers {
            mixer.update(delta_seconds);
        }

        outcome
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.surface_width = width;
        self.config.surface_height = height;
        self.pointer.resize(width as f32, height as f32);
        if width > 0 && height > 0 {
            self.camera.set_aspect(self.config.aspect());
        }
    }

    /// Replaces the highlight material.
    ///
    /// The current highlight is removed; the next frame highlights with the
    /// new material. The material is stored under a fresh ID when its name is
    /// already taken, so no scene material is overwritten.
    pub fn set_highlight_material(&mut self, mut material: Material) -> MaterialId {
        self.selection.reset(&mut self.scene);
        material.name = self.scene.material_manager.unique_id(&material.name);
        let id = self.scene.add_material(material);
        self.picking.set_highlight(id.clone());
        id
    }

    pub fn set_ambient(&mut self, ambient: f32) {
        self.config.ambient = ambient;
        self.rig
            .balance(&mut self.scene.lights, ambient, self.config.ambient_total);
    }

    pub fn set_camera_distance(&mut self, distance: f32) {
        self.config.camera_distance = distance;
        self.camera.set_distance(distance);
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot::capture(&self.scene, &self.registry, &self.selection)
    }

    pub fn export_json<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        self.snapshot().write_json(writer)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selection.selected()
    }

    pub fn camera(&self) -> &ViewCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut ViewCamera {
        &mut self.camera
    }

    pub fn pointer_ndc(&self) -> Vector2<f32> {
        self.pointer.ndc()
    }

    pub fn highlight_material(&self) -> &MaterialId {
        self.picking.highlight()
    }

    pub fn ground(&self) -> Option<ObjectId> {
        self.ground
    }

    pub fn mixers(&self) -> &[AnimationMixer] {
        &self.mixers
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}
