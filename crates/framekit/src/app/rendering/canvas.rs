use super::bitmap::Bitmap;
use super::colors::Color;
use super::font::Font;

// Every primitive clips against the canvas bounds, so callers may draw off-screen.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frame(&self) -> &[u8] {
        &self.pixels
    }

    pub fn frame_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    pub fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        let Some(offset) = self.byte_offset(x, y) else {
            return;
        };
        self.pixels[offset..offset + 4].copy_from_slice(&color);
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        let offset = self.byte_offset(x, y)?;
        let mut color = [0; 4];
        color.copy_from_slice(&self.pixels[offset..offset + 4]);
        Some(color)
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        let start_x = x.max(0);
        let start_y = y.max(0);
        let end_x = x.saturating_add(width).min(self.width as i32);
        let end_y = y.saturating_add(height).min(self.height as i32);
        if end_x <= start_x || end_y <= start_y {
            return;
        }

        for py in start_y..end_y {
            for px in start_x..end_x {
                self.put_pixel(px, py, color);
            }
        }
    }

    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        if width <= 0 || height <= 0 {
            return;
        }
        self.fill_rect(x, y, width, 1, color);
        self.fill_rect(x, y.saturating_add(height - 1), width, 1, color);
        self.fill_rect(x, y, 1, height, color);
        self.fill_rect(x.saturating_add(width - 1), y, 1, height, color);
    }

    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip_line(x0, y0, x1, y1) else {
            return;
        };
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let step_x = if x0 < x1 { 1 } else { -1 };
        let step_y = if y0 < y1 { 1 } else { -1 };
        let mut error = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.put_pixel(x as i32, y as i32, color);
            if x == x1 && y == y1 {
                break;
            }
            let doubled = 2 * error;
            if doubled >= dy {
                error += dy;
                x += step_x;
            }
            if doubled <= dx {
                error += dx;
                y += step_y;
            }
        }
    }

    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        if radius < 0 {
            return;
        }
        let radius_sq = i128::from(radius) * i128::from(radius);
        self.for_each_in_circle_bounds(cx, cy, radius, |canvas, px, py, dx, dy| {
            if distance_sq(dx, dy) <= radius_sq {
                canvas.put_pixel(px, py, color);
            }
        });
    }

    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        if radius < 0 {
            return;
        }
        // A pixel is on the outline when it is inside and at least one 4-neighbour is not.
        let radius_sq = i128::from(radius) * i128::from(radius);
        self.for_each_in_circle_bounds(cx, cy, radius, |canvas, px, py, dx, dy| {
            if distance_sq(dx, dy) > radius_sq {
                return;
            }
            let edge = [(1, 0), (-1, 0), (0, 1), (0, -1)]
                .into_iter()
                .any(|(nx, ny)| distance_sq(dx + nx, dy + ny) > radius_sq);
            if edge {
                canvas.put_pixel(px, py, color);
            }
        });
    }

    pub fn draw_text(&mut self, font: &Font, x: i32, y: i32, text: &str, color: Color) {
        font.draw(self, x, y, text, color);
    }

    pub fn draw_bitmap(&mut self, bitmap: &Bitmap, x: i32, y: i32) {
        for by in 0..bitmap.height() {
            for bx in 0..bitmap.width() {
                let Some(texel) = bitmap.texel(bx, by) else {
                    continue;
                };
                if texel[3] == 0 {
                    continue;
                }
                self.put_pixel(x.saturating_add(bx as i32), y.saturating_add(by as i32), texel);
            }
        }
    }

    // Visits only the part of the circle's bounding box that lies on the canvas.
    fn for_each_in_circle_bounds<F>(&mut self, cx: i32, cy: i32, radius: i32, mut visit: F)
    where
        F: FnMut(&mut Self, i32, i32, i64, i64),
    {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let (cx, cy, radius) = (i64::from(cx), i64::from(cy), i64::from(radius));
        let start_x = (cx - radius).max(0);
        let end_x = (cx + radius).min(i64::from(self.width) - 1);
        let start_y = (cy - radius).max(0);
        let end_y = (cy + radius).min(i64::from(self.height) - 1);
        for py in start_y..=end_y {
            for px in start_x..=end_x {
                visit(self, px as i32, py as i32, px - cx, py - cy);
            }
        }
    }

    // Liang-Barsky clip against the pixel grid so the stepping loop never leaves the canvas.
    fn clip_line(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> Option<(i64, i64, i64, i64)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let max_x = f64::from(self.width - 1);
        let max_y = f64::from(self.height - 1);
        let (fx0, fy0) = (f64::from(x0), f64::from(y0));
        let dx = f64::from(x1) - fx0;
        let dy = f64::from(y1) - fy0;

        let mut t_enter = 0.0_f64;
        let mut t_exit = 1.0_f64;
        for (p, q) in [(-dx, fx0), (dx, max_x - fx0), (-dy, fy0), (dy, max_y - fy0)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                if t > t_exit {
                    return None;
                }
                t_enter = t_enter.max(t);
            } else {
                if t < t_enter {
                    return None;
                }
                t_exit = t_exit.min(t);
            }
        }

        let snap = |value: f64, max: f64| value.round().clamp(0.0, max) as i64;
        Some((
            snap(fx0 + t_enter * dx, max_x),
            snap(fy0 + t_enter * dy, max_y),
            snap(fx0 + t_exit * dx, max_x),
            snap(fy0 + t_exit * dy, max_y),
        ))
    }

    fn byte_offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let pixel_offset = (y as usize).checked_mul(self.width as usize)?.checked_add(x as usize)?;
        let byte_offset = pixel_offset.checked_mul(4)?;
        (byte_offset + 4 <= self.pixels.len()).then_some(byte_offset)
    }
}

fn distance_sq(dx: i64, dy: i64) -> i128 {
    i128::from(dx) * i128::from(dx) + i128::from(dy) * i128::from(dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::rendering::colors;

    fn count_color(canvas: &Canvas, color: Color) -> usize {
        canvas
            .frame()
            .chunks_exact(4)
            .filter(|px| *px == color)
            .count()
    }

    #[test]
    fn new_canvas_is_zeroed_and_sized() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(canvas.frame().len(), 4 * 3 * 4);
        assert!(canvas.frame().iter().all(|byte| *byte == 0));
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut canvas = Canvas::new(5, 5);
        canvas.clear(colors::RED);
        assert_eq!(count_color(&canvas, colors::RED), 25);
    }

    #[test]
    fn put_pixel_outside_bounds_is_ignored() {
        let mut canvas = Canvas::new(2, 2);
        canvas.put_pixel(-1, 0, colors::WHITE);
        canvas.put_pixel(0, 2, colors::WHITE);
        canvas.put_pixel(2, 0, colors::WHITE);
        assert_eq!(count_color(&canvas, colors::WHITE), 0);

        canvas.put_pixel(1, 1, colors::WHITE);
        assert_eq!(canvas.get_pixel(1, 1), Some(colors::WHITE));
        assert_eq!(canvas.get_pixel(2, 2), None);
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill_rect(-4, -4, 6, 6, colors::BLUE);
        assert_eq!(count_color(&canvas, colors::BLUE), 4);

        canvas.fill_rect(6, 6, 100, 100, colors::BLUE);
        assert_eq!(count_color(&canvas, colors::BLUE), 8);
    }

    #[test]
    fn draw_rect_outlines_only_border() {
        let mut canvas = Canvas::new(8, 8);
        canvas.draw_rect(1, 1, 4, 4, colors::GREEN);
        assert_eq!(count_color(&canvas, colors::GREEN), 12);
        assert_eq!(canvas.get_pixel(2, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn draw_line_hits_both_endpoints() {
        let mut canvas = Canvas::new(10, 10);
        canvas.draw_line(1, 2, 8, 6, colors::YELLOW);
        assert_eq!(canvas.get_pixel(1, 2), Some(colors::YELLOW));
        assert_eq!(canvas.get_pixel(8, 6), Some(colors::YELLOW));

        let mut horizontal = Canvas::new(10, 1);
        horizontal.draw_line(0, 0, 9, 0, colors::YELLOW);
        assert_eq!(count_color(&horizontal, colors::YELLOW), 10);
    }

    #[test]
    fn circles_stay_within_radius() {
        let mut canvas = Canvas::new(21, 21);
        canvas.fill_circle(10, 10, 3, colors::CYAN);
        assert_eq!(canvas.get_pixel(10, 10), Some(colors::CYAN));
        assert_eq!(canvas.get_pixel(13, 10), Some(colors::CYAN));
        assert_eq!(canvas.get_pixel(13, 13), Some([0, 0, 0, 0]));

        let mut outline = Canvas::new(21, 21);
        outline.draw_circle(10, 10, 5, colors::CYAN);
        assert_eq!(outline.get_pixel(15, 10), Some(colors::CYAN));
        assert_eq!(outline.get_pixel(10, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn bitmap_draw_skips_transparent_texels() {
        let bitmap = Bitmap::from_rgba(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 0])
            .expect("valid bitmap");
        let mut canvas = Canvas::new(4, 4);
        canvas.draw_bitmap(&bitmap, 1, 1);
        assert_eq!(canvas.get_pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(2, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn extreme_line_is_clipped_to_canvas() {
        let mut canvas = Canvas::new(8, 2);
        canvas.draw_line(i32::MIN, 0, i32::MAX, 0, colors::RED);
        assert_eq!(count_color(&canvas, colors::RED), 8);
        assert_eq!(canvas.get_pixel(0, 1), Some([0, 0, 0, 0]));

        let mut diagonal = Canvas::new(10, 10);
        diagonal.draw_line(-1_000, -1_000, 1_000, 1_000, colors::RED);
        assert_eq!(diagonal.get_pixel(0, 0), Some(colors::RED));
        assert_eq!(diagonal.get_pixel(9, 9), Some(colors::RED));
        assert_eq!(count_color(&diagonal, colors::RED), 10);

        let mut missed = Canvas::new(10, 10);
        missed.draw_line(-50, 20, 50, 20, colors::RED);
        missed.draw_line(i32::MAX, i32::MIN, i32::MAX, i32::MAX, colors::RED);
        assert_eq!(count_color(&missed, colors::RED), 0);
    }

    #[test]
    fn huge_circles_only_visit_the_canvas() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill_circle(4, 4, 50_000, colors::RED);
        assert_eq!(count_color(&canvas, colors::RED), 64);

        let mut outline = Canvas::new(8, 8);
        outline.draw_circle(4, 4, 50_000, colors::RED);
        outline.draw_circle(i32::MIN, i32::MIN, i32::MAX, colors::RED);
        assert_eq!(count_color(&outline, colors::RED), 0);

        let mut edge = Canvas::new(8, 8);
        edge.fill_circle(i32::MAX, i32::MAX, i32::MAX, colors::RED);
        assert_eq!(count_color(&edge, colors::RED), 0);
    }

    #[test]
    fn shapes_at_coordinate_limits_do_not_wrap() {
        let mut canvas = Canvas::new(4, 4);
        canvas.draw_rect(i32::MAX - 1, i32::MAX - 1, i32::MAX, i32::MAX, colors::BLUE);
        let bitmap = Bitmap::from_rgba(2, 1, vec![255; 8]).expect("valid bitmap");
        canvas.draw_bitmap(&bitmap, i32::MAX, 0);
        assert_eq!(count_color(&canvas, colors::BLUE), 0);
        assert_eq!(count_color(&canvas, [255, 255, 255, 255]), 0);
    }
}
