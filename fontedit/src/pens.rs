//! Pens for capturing outlines drawn out of compiled fonts.

use kurbo::BezPath;
use skrifa::outline::OutlinePen;

/// Captures skrifa drawing commands into a [BezPath].
#[derive(Debug, Default)]
pub struct BezPathPen {
    path: BezPath,
}

impl BezPathPen {
    pub fn new() -> BezPathPen {
        Default::default()
    }

    pub fn into_inner(self) -> BezPath {
        self.path
    }
}

impl OutlinePen for BezPathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path
            .quad_to((cx0 as f64, cy0 as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

#[cfg(test)]
mod tests {
    use kurbo::BezPath;
    use skrifa::outline::OutlinePen;

    use super::BezPathPen;

    #[test]
    fn captures_commands() {
        let mut pen = BezPathPen::new();
        pen.move_to(1.0, 1.0);
        pen.line_to(2.0, 1.0);
        pen.quad_to(3.0, 1.0, 3.0, 2.0);
        pen.close();
        assert_eq!(
            BezPath::from_svg("M1,1 L2,1 Q3,1 3,2 Z").unwrap(),
            pen.into_inner()
        );
    }
}
