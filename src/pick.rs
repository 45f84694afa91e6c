//! Screen picks: screen point to world ray to nearest triangle
//!
//! The ray-triangle test is delegated to parry3d. This module owns only the
//! camera unprojection and the selection policy: the nearest hit along the
//! ray wins, and a miss is `None`, never an error.

use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector3};
use parry3d::math::Vector as ParryVector;
use parry3d::query::{Ray, RayCast};
use parry3d::shape::Triangle as ParryTriangle;

use crate::mesh::{TriangleMesh, calculate_face_normal, normal_matrix};

/// A ray in world space with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    /// Ray origin
    pub origin: Point3<f64>,
    /// Unit direction
    pub direction: Vector3<f64>,
}

impl PickRay {
    /// Create a ray, normalizing `direction`; `None` if it has no length
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Option<Self> {
        let direction = direction.try_normalize(0.0)?;
        Some(Self { origin, direction })
    }

    /// Point at distance `t` along the ray
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

/// Pixel rectangle the scene is drawn into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge in client pixels
    pub left: f64,
    /// Top edge in client pixels
    pub top: f64,
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl Viewport {
    /// Viewport anchored at the client origin
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Map client pixel coordinates to normalized device coordinates
    ///
    /// `x` runs -1 (left) to 1 (right) and `y` -1 (bottom) to 1 (top).
    /// Returns `None` for an empty viewport.
    pub fn to_ndc(&self, client_x: f64, client_y: f64) -> Option<(f64, f64)> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return None;
        }
        let x = ((client_x - self.left) / self.width) * 2.0 - 1.0;
        let y = -((client_y - self.top) / self.height) * 2.0 + 1.0;
        Some((x, y))
    }

    /// Width over height
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// Perspective camera looking at a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position
    pub eye: Point3<f64>,
    /// Point the camera looks at
    pub target: Point3<f64>,
    /// Up hint
    pub up: Vector3<f64>,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f64,
    /// Width over height
    pub aspect: f64,
    /// Near clip distance
    pub near: f64,
    /// Far clip distance
    pub far: f64,
}

impl Camera {
    /// The viewer's default camera: 75° FOV, eye at `(0, 0, 200)` looking at the origin
    pub fn new(aspect: f64) -> Self {
        Self {
            eye: Point3::new(0.0, 0.0, 200.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov_y_degrees: 75.0,
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    fn is_valid(&self) -> bool {
        self.aspect.is_finite()
            && self.aspect > 0.0
            && self.near > 0.0
            && self.far > self.near
            && self.fov_y_degrees > 0.0
            && self.fov_y_degrees < 180.0
            && (self.target - self.eye).cross(&self.up).norm() > 0.0
    }

    /// World-to-camera matrix
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Isometry3::look_at_rh(&self.eye, &self.target, &self.up).to_homogeneous()
    }

    /// Camera-to-clip matrix, `None` if the camera parameters are unusable
    pub fn projection_matrix(&self) -> Option<Matrix4<f64>> {
        self.is_valid().then(|| {
            Perspective3::new(
                self.aspect,
                self.fov_y_degrees.to_radians(),
                self.near,
                self.far,
            )
            .to_homogeneous()
        })
    }

    /// Ray from the eye through an NDC point
    pub fn ray_from_ndc(&self, ndc_x: f64, ndc_y: f64) -> Option<PickRay> {
        let clip_from_world = self.projection_matrix()? * self.view_matrix();
        let world_from_clip = clip_from_world.try_inverse()?;
        let on_near_plane = world_from_clip.transform_point(&Point3::new(ndc_x, ndc_y, -1.0));
        PickRay::new(self.eye, on_near_plane - self.eye)
    }
}

/// The triangle a pick landed on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Index of the triangle in the picked mesh
    pub triangle_index: usize,
    /// Distance from the ray origin
    pub distance: f64,
    /// World-space hit point
    pub point: Point3<f64>,
    /// Unit face normal in world space
    pub face_normal_world: Vector3<f64>,
}

fn to_parry(p: &Point3<f64>) -> ParryVector {
    ParryVector::new(p.x as f32, p.y as f32, p.z as f32)
}

/// Intersect a world-space ray with every triangle of `mesh` placed by `world`
///
/// Returns the hit with the smallest positive distance, or `None` on a miss.
pub fn resolve_ray(ray: &PickRay, mesh: &TriangleMesh, world: &Matrix4<f64>) -> Option<PickHit> {
    let parry_ray = Ray::new(
        to_parry(&ray.origin),
        ParryVector::new(
            ray.direction.x as f32,
            ray.direction.y as f32,
            ray.direction.z as f32,
        ),
    );

    let mut nearest: Option<(usize, f32)> = None;
    for (index, triangle) in mesh.triangles().enumerate() {
        let [a, b, c] = triangle.positions.map(|p| world.transform_point(&p));
        if ![a, b, c].iter().all(|p| p.iter().all(|v| v.is_finite())) {
            continue;
        }
        let shape = ParryTriangle::new(to_parry(&a), to_parry(&b), to_parry(&c));
        let Some(toi) = shape.cast_local_ray(&parry_ray, f32::MAX, true) else {
            continue;
        };
        if toi > 0.0 && nearest.is_none_or(|(_, best)| toi < best) {
            nearest = Some((index, toi));
        }
    }

    let (triangle_index, toi) = nearest?;
    let triangle = mesh.triangle(triangle_index)?;
    let distance = toi as f64;

    let stored = normal_matrix(world)
        .ok()
        .and_then(|m| (m * triangle.face_normal()).try_normalize(0.0));
    let face_normal_world = stored.unwrap_or_else(|| {
        let [a, b, c] = triangle.positions.map(|p| world.transform_point(&p));
        calculate_face_normal(&a, &b, &c)
    });

    Some(PickHit {
        triangle_index,
        distance,
        point: ray.point_at(distance),
        face_normal_world,
    })
}

/// Resolve a click at client pixel `(client_x, client_y)`
///
/// # Example
/// ```
/// use nalgebra::Matrix4;
/// use printprep::TriangleMesh;
/// use printprep::pick::{Camera, Viewport, resolve_pick};
///
/// let viewport = Viewport::new(800.0, 600.0);
/// let camera = Camera::new(viewport.aspect());
/// let hit = resolve_pick(400.0, 300.0, &viewport, &camera, &TriangleMesh::new(), &Matrix4::identity());
/// assert!(hit.is_none());
/// ```
pub fn resolve_pick(
    client_x: f64,
    client_y: f64,
    viewport: &Viewport,
    camera: &Camera,
    mesh: &TriangleMesh,
    world: &Matrix4<f64>,
) -> Option<PickHit> {
    let (ndc_x, ndc_y) = viewport.to_ndc(client_x, client_y)?;
    let ray = camera.ray_from_ndc(ndc_x, ndc_y)?;
    resolve_ray(&ray, mesh, world)
}
