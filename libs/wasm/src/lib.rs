//! WASM-facing entry points for the FFD kernel.
//!
//! This crate is compiled to a `cdylib` and consumed from JavaScript via
//! `wasm-bindgen`. [`FfdHandle`] owns one [`FfdKernel`] and exposes it with
//! the export names the browser host calls (`rebuildLattice`,
//! `deformModelVerts`, ...). Native tests interact with the `*_internal`
//! helpers to avoid depending on a JS host.
//!
//! ```
//! use ffd_wasm::FfdHandle;
//!
//! let mut handle = FfdHandle::new();
//! handle
//!     .rebuild_lattice_internal([0.0; 3], [2.0; 3], [2, 2, 2])
//!     .unwrap();
//! assert_eq!(handle.total_control_points(), 27);
//! ```

use config::constants::FfdConfig;
use ffd_kernel::{Axis, FfdError, FfdKernel, SpanCounts, Vec3};
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Installs a panic hook that forwards Rust panics to the browser console.
///
/// # Examples
/// ```no_run
/// // In JavaScript: import and call once at startup.
/// // import { init_panic_hook } from "ffd-wasm";
/// // init_panic_hook();
/// ```
#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Errors raised by the binding layer before they are turned into JS values.
#[derive(Debug, Error)]
pub enum BindingError {
    /// The kernel rejected the request.
    #[error(transparent)]
    Kernel(#[from] FfdError),

    /// A JSON configuration could not be parsed.
    #[error("Invalid configuration JSON: {0}")]
    ConfigJson(#[from] serde_json::Error),

    /// The three mesh coordinate arrays differ in length.
    #[error("Mesh coordinate arrays differ in length: x={x}, y={y}, z={z}")]
    MismatchedBuffers {
        /// Length of the X array
        x: usize,
        /// Length of the Y array
        y: usize,
        /// Length of the Z array
        z: usize,
    },
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Lattice summary handed to the host as JSON.
///
/// Vectors serialize as `[x, y, z]` arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatticeInfo {
    /// Spans along S/T/U
    pub spans: [usize; 3],
    /// Control points along S/T/U
    pub counts: [usize; 3],
    /// Total control points
    pub total: usize,
    /// Lower corner of the lattice box
    pub bbox_min: Vec3,
    /// Upper corner of the lattice box
    pub bbox_max: Vec3,
}

/// A JavaScript-owned FFD instance.
///
/// # Example (JavaScript)
///
/// ```javascript
/// const ffd = new FfdHandle();
/// ffd.setModelVerts(xs, ys, zs);
/// ffd.storeUndeformedVerts();
/// ffd.rebuildLattice(minX, minY, minZ, maxX, maxY, maxZ, 2, 2, 2);
///
/// ffd.setPosition(ffd.getIndex(1, 1, 1), x, y, z);
/// ffd.deformModelVerts();
/// const deformedX = ffd.dataModelVertsX(); // Float64Array
/// ```
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct FfdHandle {
    kernel: FfdKernel,
}

#[wasm_bindgen]
impl FfdHandle {
    /// Creates a handle with the default sizing (27 control points, 2048
    /// mesh vertices, 17x17x17 volume grid).
    #[wasm_bindgen(constructor)]
    pub fn new() -> FfdHandle {
        Self::default()
    }

    /// Creates a handle from a JSON-encoded `FfdConfig`. Missing fields take
    /// their default values.
    ///
    /// # Errors
    /// Returns a JavaScript error when the JSON or the configuration is invalid.
    #[wasm_bindgen(js_name = withConfigJson)]
    pub fn with_config_json(json: &str) -> Result<FfdHandle, JsValue> {
        Self::with_config_json_internal(json).map_err(to_js)
    }

    // -------------------------------------------------------------------------
    // Bounding box
    // -------------------------------------------------------------------------

    /// Lower X bound of the lattice box.
    #[wasm_bindgen(js_name = bboxMinX)]
    pub fn bbox_min_x(&self) -> f64 {
        self.kernel.bounding_box().min.x
    }

    /// Lower Y bound of the lattice box.
    #[wasm_bindgen(js_name = bboxMinY)]
    pub fn bbox_min_y(&self) -> f64 {
        self.kernel.bounding_box().min.y
    }

    /// Lower Z bound of the lattice box.
    #[wasm_bindgen(js_name = bboxMinZ)]
    pub fn bbox_min_z(&self) -> f64 {
        self.kernel.bounding_box().min.z
    }

    /// Upper X bound of the lattice box.
    #[wasm_bindgen(js_name = bboxMaxX)]
    pub fn bbox_max_x(&self) -> f64 {
        self.kernel.bounding_box().max.x
    }

    /// Upper Y bound of the lattice box.
    #[wasm_bindgen(js_name = bboxMaxY)]
    pub fn bbox_max_y(&self) -> f64 {
        self.kernel.bounding_box().max.y
    }

    /// Upper Z bound of the lattice box.
    #[wasm_bindgen(js_name = bboxMaxZ)]
    pub fn bbox_max_z(&self) -> f64 {
        self.kernel.bounding_box().max.z
    }

    // -------------------------------------------------------------------------
    // Control points
    // -------------------------------------------------------------------------

    /// Control point count along `direction` (0 = S, 1 = T, 2 = U).
    ///
    /// # Errors
    /// Returns a JavaScript error for a direction outside 0..3.
    #[wasm_bindgen(js_name = getCtrlPtCount)]
    pub fn get_ctrl_pt_count(&self, direction: u32) -> Result<u32, JsValue> {
        self.control_point_count_internal(direction as usize)
            .map(to_u32)
            .map_err(to_js)
    }

    /// Total number of control points.
    #[wasm_bindgen(js_name = getTotalCtrlPtCount)]
    pub fn get_total_ctrl_pt_count(&self) -> u32 {
        to_u32(self.total_control_points())
    }

    /// Linear index of control point (i, j, k).
    ///
    /// # Errors
    /// Returns a JavaScript error for components outside the lattice.
    #[wasm_bindgen(js_name = getIndex)]
    pub fn get_index(&self, i: u32, j: u32, k: u32) -> Result<u32, JsValue> {
        self.kernel
            .index(i as usize, j as usize, k as usize)
            .map(to_u32)
            .map_err(to_js)
    }

    /// X coordinate of control point `index`.
    ///
    /// # Errors
    /// Returns a JavaScript error when `index` is not a control point.
    #[wasm_bindgen(js_name = getPositionX)]
    pub fn get_position_x(&self, index: u32) -> Result<f64, JsValue> {
        self.position_internal(index as usize).map(|p| p.x).map_err(to_js)
    }

    /// Y coordinate of control point `index`.
    ///
    /// # Errors
    /// Returns a JavaScript error when `index` is not a control point.
    #[wasm_bindgen(js_name = getPositionY)]
    pub fn get_position_y(&self, index: u32) -> Result<f64, JsValue> {
        self.position_internal(index as usize).map(|p| p.y).map_err(to_js)
    }

    /// Z coordinate of control point `index`.
    ///
    /// # Errors
    /// Returns a JavaScript error when `index` is not a control point.
    #[wasm_bindgen(js_name = getPositionZ)]
    pub fn get_position_z(&self, index: u32) -> Result<f64, JsValue> {
        self.position_internal(index as usize).map(|p| p.z).map_err(to_js)
    }

    /// Moves control point `index`.
    ///
    /// # Errors
    /// Returns a JavaScript error when `index` is not a control point.
    #[wasm_bindgen(js_name = setPosition)]
    pub fn set_position(&mut self, index: u32, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        self.kernel
            .set_position(index as usize, Vec3::new(x, y, z))
            .map_err(to_js)
    }

    /// Moves control point (i, j, k).
    ///
    /// # Errors
    /// Returns a JavaScript error for components outside the lattice.
    #[wasm_bindgen(js_name = setPositionTernary)]
    pub fn set_position_ternary(
        &mut self,
        i: u32,
        j: u32,
        k: u32,
        x: f64,
        y: f64,
        z: f64,
    ) -> Result<(), JsValue> {
        self.kernel
            .set_position_at(i as usize, j as usize, k as usize, Vec3::new(x, y, z))
            .map_err(to_js)
    }

    /// Control point pairs to draw as lattice lines, flattened as
    /// `[a0, b0, a1, b1, ...]`.
    #[wasm_bindgen(js_name = latticeEdges)]
    pub fn lattice_edges(&self) -> Vec<u32> {
        self.kernel
            .lattice()
            .edges()
            .into_iter()
            .flat_map(|(a, b)| [to_u32(a), to_u32(b)])
            .collect()
    }

    /// Lattice spans, counts and box as a JSON string.
    ///
    /// # Errors
    /// Returns a JavaScript error if serialization fails.
    #[wasm_bindgen(js_name = latticeInfoJson)]
    pub fn lattice_info_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.lattice_info()).map_err(to_js)
    }

    /// Rebuilds the lattice over the given box with the given span counts.
    /// Returns false when nothing changed.
    ///
    /// # Errors
    /// Returns a JavaScript error for zero span counts or when the lattice
    /// would exceed the control point capacity.
    #[wasm_bindgen(js_name = rebuildLattice)]
    #[allow(clippy::too_many_arguments)]
    pub fn rebuild_lattice(
        &mut self,
        min_x: f64,
        min_y: f64,
        min_z: f64,
        max_x: f64,
        max_y: f64,
        max_z: f64,
        span_s: u32,
        span_t: u32,
        span_u: u32,
    ) -> Result<bool, JsValue> {
        self.rebuild_lattice_internal(
            [min_x, min_y, min_z],
            [max_x, max_y, max_z],
            [span_s as usize, span_t as usize, span_u as usize],
        )
        .map_err(to_js)
    }

    /// Rebuilds the lattice around the bounding box of the vertices passed to
    /// `setModelVerts`, scaled by `scale` to match a model displayed at that
    /// scale.
    ///
    /// # Errors
    /// As `rebuildLattice`.
    #[wasm_bindgen(js_name = rebuildAroundModel)]
    pub fn rebuild_around_model(
        &mut self,
        span_s: u32,
        span_t: u32,
        span_u: u32,
        scale: f64,
    ) -> Result<bool, JsValue> {
        self.rebuild_around_model_internal([span_s as usize, span_t as usize, span_u as usize], scale)
            .map_err(to_js)
    }

    /// Deforms a single world-space point, returned as `[x, y, z]`.
    ///
    /// # Errors
    /// Returns a JavaScript error for a collapsed lattice box.
    #[wasm_bindgen(js_name = evalWorld)]
    pub fn eval_world(&self, x: f64, y: f64, z: f64) -> Result<Vec<f64>, JsValue> {
        self.kernel
            .eval_world(Vec3::new(x, y, z))
            .map(|p| p.to_array().to_vec())
            .map_err(to_js)
    }

    // -------------------------------------------------------------------------
    // Model vertices
    //
    // The `data*` accessors copy the buffer into a fresh typed array on every
    // call. Hosts refreshing every frame should call them once per frame.
    // -------------------------------------------------------------------------

    /// Number of model vertex slots.
    #[wasm_bindgen(js_name = modelVertexCount)]
    pub fn model_vertex_count(&self) -> u32 {
        to_u32(self.kernel.mesh_vertices().len())
    }

    /// Copies vertex coordinates into the front of the model buffers and
    /// zeroes the remaining slots.
    ///
    /// # Errors
    /// Returns a JavaScript error when the arrays differ in length or exceed
    /// the mesh capacity.
    #[wasm_bindgen(js_name = setModelVerts)]
    pub fn set_model_verts(&mut self, x: &[f64], y: &[f64], z: &[f64]) -> Result<(), JsValue> {
        self.set_model_verts_internal(x, y, z).map_err(to_js)
    }

    /// Captures the current model vertices as the undeformed reference.
    #[wasm_bindgen(js_name = storeUndeformedVerts)]
    pub fn store_undeformed_verts(&mut self) {
        self.kernel.snapshot_undeformed();
    }

    /// Deforms the model vertices through the lattice and returns how many
    /// were rewritten.
    ///
    /// # Errors
    /// Returns a JavaScript error before `storeUndeformedVerts` or for a
    /// collapsed lattice box.
    #[wasm_bindgen(js_name = deformModelVerts)]
    pub fn deform_model_verts(&mut self) -> Result<u32, JsValue> {
        self.deform_internal().map(to_u32).map_err(to_js)
    }

    /// Copy of the current model X coordinates, one entry per vertex slot.
    #[wasm_bindgen(js_name = dataModelVertsX)]
    pub fn data_model_verts_x(&self) -> js_sys::Float64Array {
        js_sys::Float64Array::from(self.kernel.mesh_vertices().x)
    }

    /// Copy of the current model Y coordinates, one entry per vertex slot.
    #[wasm_bindgen(js_name = dataModelVertsY)]
    pub fn data_model_verts_y(&self) -> js_sys::Float64Array {
        js_sys::Float64Array::from(self.kernel.mesh_vertices().y)
    }

    /// Copy of the current model Z coordinates, one entry per vertex slot.
    #[wasm_bindgen(js_name = dataModelVertsZ)]
    pub fn data_model_verts_z(&self) -> js_sys::Float64Array {
        js_sys::Float64Array::from(self.kernel.mesh_vertices().z)
    }

    // -------------------------------------------------------------------------
    // Volume samples
    // -------------------------------------------------------------------------

    /// Number of volume sample points.
    #[wasm_bindgen(js_name = volumePointCount)]
    pub fn volume_point_count(&self) -> u32 {
        to_u32(self.kernel.volume().sample_count())
    }

    /// Evaluates the lattice over the volume grid and returns how many
    /// samples were rewritten.
    #[wasm_bindgen(js_name = evalVolumePoints)]
    pub fn eval_volume_points(&mut self) -> u32 {
        to_u32(self.kernel.sample_volume().written)
    }

    /// Copy of the volume sample X coordinates.
    #[wasm_bindgen(js_name = dataVolumePointsX)]
    pub fn data_volume_points_x(&self) -> js_sys::Float64Array {
        js_sys::Float64Array::from(self.kernel.volume_samples().x)
    }

    /// Copy of the volume sample Y coordinates.
    #[wasm_bindgen(js_name = dataVolumePointsY)]
    pub fn data_volume_points_y(&self) -> js_sys::Float64Array {
        js_sys::Float64Array::from(self.kernel.volume_samples().y)
    }

    /// Copy of the volume sample Z coordinates.
    #[wasm_bindgen(js_name = dataVolumePointsZ)]
    pub fn data_volume_points_z(&self) -> js_sys::Float64Array {
        js_sys::Float64Array::from(self.kernel.volume_samples().z)
    }
}

/// Host-only helpers returning Rust errors. These back the exports above.
impl FfdHandle {
    /// Parses an `FfdConfig` from JSON and builds a handle from it.
    ///
    /// # Examples
    /// ```
    /// use ffd_wasm::FfdHandle;
    /// let handle = FfdHandle::with_config_json_internal(r#"{"mesh_vertex_capacity": 8}"#).unwrap();
    /// assert_eq!(handle.kernel().mesh_vertices().len(), 8);
    /// ```
    pub fn with_config_json_internal(json: &str) -> Result<Self, BindingError> {
        let config: FfdConfig = serde_json::from_str(json)?;
        let kernel = FfdKernel::new(config)?;
        Ok(Self { kernel })
    }

    /// The wrapped kernel.
    pub fn kernel(&self) -> &FfdKernel {
        &self.kernel
    }

    /// Total number of control points.
    pub fn total_control_points(&self) -> usize {
        self.kernel.total_control_points()
    }

    /// Control point count along `direction` (0 = S, 1 = T, 2 = U).
    pub fn control_point_count_internal(&self, direction: usize) -> Result<usize, FfdError> {
        let axis = Axis::from_index(direction).ok_or(FfdError::IndexOutOfRange {
            index: direction,
            len: Axis::ALL.len(),
        })?;
        Ok(self.kernel.control_point_count(axis))
    }

    /// Position of control point `index`.
    pub fn position_internal(&self, index: usize) -> Result<Vec3, FfdError> {
        self.kernel.position(index)
    }

    /// Rebuilds the lattice from plain arrays.
    pub fn rebuild_lattice_internal(
        &mut self,
        min: [f64; 3],
        max: [f64; 3],
        spans: [usize; 3],
    ) -> Result<bool, FfdError> {
        self.kernel
            .rebuild(Vec3::from_array(min), Vec3::from_array(max), SpanCounts::from(spans))
    }

    /// Rebuilds the lattice around the loaded model vertices.
    pub fn rebuild_around_model_internal(&mut self, spans: [usize; 3], scale: f64) -> Result<bool, FfdError> {
        self.kernel.rebuild_around_mesh(SpanCounts::from(spans), scale)
    }

    /// Loads model vertices from three coordinate slices.
    pub fn set_model_verts_internal(&mut self, x: &[f64], y: &[f64], z: &[f64]) -> Result<(), BindingError> {
        if x.len() != y.len() || x.len() != z.len() {
            return Err(BindingError::MismatchedBuffers {
                x: x.len(),
                y: y.len(),
                z: z.len(),
            });
        }
        let points: Vec<Vec3> = x
            .iter()
            .zip(y)
            .zip(z)
            .map(|((&x, &y), &z)| Vec3::new(x, y, z))
            .collect();
        self.kernel.load_mesh(&points)?;
        Ok(())
    }

    /// Deforms the model vertices; returns how many were rewritten.
    pub fn deform_internal(&mut self) -> Result<usize, FfdError> {
        self.kernel.deform().map(|stats| stats.written)
    }

    /// Summary of the current lattice.
    pub fn lattice_info(&self) -> LatticeInfo {
        let lattice = self.kernel.lattice();
        let bbox = lattice.bounding_box();
        LatticeInfo {
            spans: lattice.spans().to_array(),
            counts: lattice.control_point_counts(),
            total: lattice.total_control_points(),
            bbox_min: bbox.min,
            bbox_max: bbox.max,
        }
    }
}

#[cfg(test)]
mod tests;
