//! All boundary tests are inclusive: shapes that merely touch count as intersecting.

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rectangle {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            x: left,
            y: top,
            w: right - left,
            h: bottom - top,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub r: f32,
}

impl Circle {
    pub const fn new(x: f32, y: f32, r: f32) -> Self {
        Self { x, y, r }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub dx: f32,
    pub dy: f32,
}

impl Velocity {
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    pub fn apply(&self, point: Point) -> Point {
        Point::new(point.x + self.dx, point.y + self.dy)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Line {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Line {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }
}

pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

pub fn rad_to_deg(radians: f32) -> f32 {
    radians.to_degrees()
}

pub fn angle_between_points(from: Point, to: Point) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

pub fn distance_between_points(a: Point, b: Point) -> f32 {
    distance_squared(a, b).sqrt()
}

pub fn rectangles_intersect(a: Rectangle, b: Rectangle) -> bool {
    !(a.right() < b.x || a.bottom() < b.y || a.x > b.right() || a.y > b.bottom())
}

pub fn rectangle_contains_point(rect: Rectangle, point: Point) -> bool {
    !(point.x < rect.x || point.x > rect.right() || point.y < rect.y || point.y > rect.bottom())
}

pub fn circles_intersect(a: Circle, b: Circle) -> bool {
    let reach = a.r + b.r;
    distance_squared(a.center(), b.center()) <= reach * reach
}

pub fn circle_contains_point(circle: Circle, point: Point) -> bool {
    distance_squared(circle.center(), point) <= circle.r * circle.r
}

pub fn lines_intersect(a: Line, b: Line) -> bool {
    let (p1, p2, q1, q2) = (a.start(), a.end(), b.start(), b.end());
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

fn distance_squared(a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx * dx + dy * dy
}

fn cross(origin: Point, a: Point, b: Point) -> f32 {
    (a.x - origin.x) * (b.y - origin.y) - (a.y - origin.y) * (b.x - origin.x)
}

// Assumes `point` is collinear with the segment.
fn on_segment(start: Point, end: Point, point: Point) -> bool {
    point.x >= start.x.min(end.x)
        && point.x <= start.x.max(end.x)
        && point.y >= start.y.min(end.y)
        && point.y <= start.y.max(end.y)
}
