/*!
# meshview

Interactive viewer core for polygonal meshes.

**meshview** is the ingestion and rendering pipeline of a single-model 3D
viewer: it loads a mesh from an OBJ-style text file, tessellates it into
GPU-ready buffers, and renders it every frame with a lit fill pass and an
optional wireframe overlay. Everything around it (window creation, docking,
menus, sliders) is expected to live in the embedding application and talk
to this crate through a handful of plain function calls.

The pipeline, leaf to root:

* [`loader::obj`] parses `v`/`vn`/`f` records into a [`ViewerMesh`](mesh::ViewerMesh).
* [`mesh`] synthesizes vertex normals when the file has none, and
  fan-triangulates every face into interleaved vertex streams.
* [`resource`] owns the GPU-resident fill and wireframe buffers.
* [`camera`] holds the orbit/pan/dolly state and the projection math.
* [`renderer`] drives the per-frame state machine: clear, project, view,
  fill pass, optional overlay pass.
* [`viewer`] ties it together behind the facade the UI layer calls.

A minimal embedding looks like:

```no_run
use meshview::prelude::*;

# fn demo() -> Result<(), meshview::loader::ParseError> {
let mut viewer = Viewer::new();
let summary = viewer.load("suzanne.obj")?;
println!("{} vertices, {} edges", summary.vertex_count, summary.edge_count);

viewer.set_wireframe_enabled(true);
viewer.on_key(Key::F); // focus the model
# Ok(())
# }
```

Mouse, wheel and keyboard handling stays in the embedding toolkit; it
forwards deltas via [`Viewer::on_pointer_drag`](viewer::Viewer::on_pointer_drag),
[`Viewer::on_wheel`](viewer::Viewer::on_wheel) and
[`Viewer::on_key`](viewer::Viewer::on_key).
*/
#![allow(clippy::module_inception)]
#![allow(clippy::too_many_arguments)]

#[macro_use]
extern crate bitflags;

pub use glamx;

pub mod camera;
pub mod color;
pub mod context;
pub mod event;
pub mod loader;
pub mod mesh;
pub mod renderer;
pub mod resource;
pub mod viewer;
pub mod viewport;

pub mod prelude {
    pub use crate::camera::*;
    pub use crate::color::*;
    pub use crate::context::*;
    pub use crate::event::*;
    pub use crate::loader::*;
    pub use crate::mesh::*;
    pub use crate::renderer::*;
    pub use crate::resource::*;
    pub use crate::viewer::*;
    pub use crate::viewport::*;
    pub use glamx::{Mat4, Vec2, Vec3};
}
