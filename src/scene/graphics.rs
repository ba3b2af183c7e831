//! Graphics context - recorded vector drawing commands.
//!
//! Shapes are queued as a path and committed by `fill` or `stroke`, the way
//! an immediate-mode canvas API reads:
//!
//! ```
//! use spark_canvas::scene::GraphicsContext;
//! use spark_canvas::{Rect, Rgba};
//!
//! let mut g = GraphicsContext::new();
//! g.rect(Rect::new(0.0, 0.0, 10.0, 10.0)).fill(Rgba::RED);
//! assert_eq!(g.command_count(), 1);
//! ```

use kurbo::{BezPath, Circle, Line, Point, Rect, Shape};

use crate::types::Rgba;

/// A single shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect(Rect),
    Circle(Circle),
    Line(Line),
    Path(BezPath),
}

impl Primitive {
    pub fn bounding_box(&self) -> Rect {
        match self {
            Primitive::Rect(rect) => rect.bounding_box(),
            Primitive::Circle(circle) => circle.bounding_box(),
            Primitive::Line(line) => line.bounding_box(),
            Primitive::Path(path) => path.bounding_box(),
        }
    }
}

/// How a committed shape is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill(Rgba),
    Stroke { color: Rgba, width: f64 },
}

/// A committed shape with its paint.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub primitive: Primitive,
    pub paint: Paint,
}

impl DrawCommand {
    /// Local-space extent, including half the stroke width.
    pub fn bounds(&self) -> Rect {
        let bounds = self.primitive.bounding_box();
        match self.paint {
            Paint::Fill(_) => bounds,
            Paint::Stroke { width, .. } => bounds.inflate(width / 2.0, width / 2.0),
        }
    }
}

/// Drawing state owned by a graphics node.
#[derive(Debug, Clone, Default)]
pub struct GraphicsContext {
    commands: Vec<DrawCommand>,
    path: Vec<Primitive>,
}

impl GraphicsContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every command and any uncommitted path.
    pub fn clear(&mut self) -> &mut Self {
        self.commands.clear();
        self.path.clear();
        self
    }

    pub fn rect(&mut self, rect: Rect) -> &mut Self {
        self.path.push(Primitive::Rect(rect));
        self
    }

    pub fn circle(&mut self, center: Point, radius: f64) -> &mut Self {
        self.path.push(Primitive::Circle(Circle::new(center, radius)));
        self
    }

    pub fn line(&mut self, from: Point, to: Point) -> &mut Self {
        self.path.push(Primitive::Line(Line::new(from, to)));
        self
    }

    /// Closed polygon through `points`. Fewer than two points is ignored.
    pub fn polygon(&mut self, points: &[Point]) -> &mut Self {
        let Some((first, rest)) = points.split_first() else {
            return self;
        };
        if rest.is_empty() {
            return self;
        }

        let mut path = BezPath::new();
        path.move_to(*first);
        for point in rest {
            path.line_to(*point);
        }
        path.close_path();
        self.path.push(Primitive::Path(path));
        self
    }

    /// Commit the current path as filled shapes.
    pub fn fill(&mut self, color: Rgba) -> &mut Self {
        self.commit(Paint::Fill(color))
    }

    /// Commit the current path as stroked outlines.
    pub fn stroke(&mut self, color: Rgba, width: f64) -> &mut Self {
        self.commit(Paint::Stroke { color, width })
    }

    fn commit(&mut self, paint: Paint) -> &mut Self {
        for primitive in self.path.drain(..) {
            self.commands.push(DrawCommand { primitive, paint });
        }
        self
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Union of all committed commands, in local space.
    pub fn local_bounds(&self) -> Option<Rect> {
        self.commands
            .iter()
            .map(DrawCommand::bounds)
            .reduce(|acc, rect| acc.union(rect))
    }
}
