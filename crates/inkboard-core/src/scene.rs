//! Ordered element list.

use crate::shapes::Element;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// All committed elements, back to front.
///
/// Serializes as the bare element array stored in a document's `data` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scene {
    elements: Vec<Element>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Append an element on top of everything else.
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Elements in z-order (back to front).
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Remove every element the eraser hits at `point`.
    /// Survivors keep their relative order. Returns how many were removed.
    pub fn erase_at(&mut self, point: Point) -> usize {
        let before = self.elements.len();
        self.elements.retain(|el| !el.erase_hit(point));
        let removed = before - self.elements.len();
        if removed > 0 {
            log::debug!(
                "Eraser removed {} element(s) at ({:.1}, {:.1})",
                removed,
                point.x,
                point.y
            );
        }
        removed
    }

    /// Indices of elements the eraser would hit at `point`, front to back.
    pub fn elements_at(&self, point: Point) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, el)| el.erase_hit(point))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Union of all element bounds, `None` when empty.
    pub fn bounds(&self) -> Option<Rect> {
        let mut result: Option<Rect> = None;
        for element in &self.elements {
            let bounds = element.bounds();
            result = Some(match result {
                Some(r) => r.union(bounds),
                None => bounds,
            });
        }
        result
    }

    /// Serialize to the JSON array stored in a document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.elements)
    }

    /// Deserialize from a document's JSON array.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<Vec<Element>> for Scene {
    fn from(elements: Vec<Element>) -> Self {
        Self::from_elements(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{CssColor, LineElement, PathElement, RectElement, TextElement};

    fn path_through(points: &[(f64, f64)]) -> Element {
        Element::Path(PathElement::from_points(
            points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            CssColor::black(),
            2.0,
        ))
    }

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::Rect(RectElement::new(Point::new(x, y), w, h, CssColor::black(), None, 2.0))
    }

    #[test]
    fn test_push_preserves_order() {
        let mut scene = Scene::new();
        scene.push(rect(0.0, 0.0, 10.0, 10.0));
        scene.push(path_through(&[(1.0, 1.0)]));
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.elements()[0].type_name(), "rect");
        assert_eq!(scene.elements()[1].type_name(), "path");
    }

    #[test]
    fn test_eraser_removes_proximate_path() {
        let mut scene = Scene::new();
        scene.push(path_through(&[(0.0, 0.0), (100.0, 100.0)]));

        assert_eq!(scene.erase_at(Point::new(200.0, 200.0)), 0);
        assert_eq!(scene.len(), 1);

        assert_eq!(scene.erase_at(Point::new(105.0, 103.0)), 1);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_erase_keeps_survivor_order() {
        let mut scene = Scene::new();
        scene.push(rect(0.0, 0.0, 10.0, 10.0));
        scene.push(rect(100.0, 100.0, 10.0, 10.0));
        scene.push(rect(5.0, 5.0, 10.0, 10.0));
        scene.push(rect(200.0, 200.0, 10.0, 10.0));

        assert_eq!(scene.erase_at(Point::new(7.0, 7.0)), 2);
        let xs: Vec<f64> = scene
            .elements()
            .iter()
            .map(|el| el.bounds().x0)
            .collect();
        assert_eq!(xs, vec![100.0, 200.0]);
    }

    #[test]
    fn test_eraser_hits_negative_rect() {
        let mut scene = Scene::new();
        scene.push(rect(50.0, 50.0, -20.0, -20.0));
        assert_eq!(scene.erase_at(Point::new(40.0, 40.0)), 1);
    }

    #[test]
    fn test_eraser_line_box() {
        let mut scene = Scene::new();
        scene.push(Element::Line(LineElement::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            CssColor::black(),
            2.0,
        )));
        assert_eq!(scene.erase_at(Point::new(50.0, 11.0)), 0);
        assert_eq!(scene.erase_at(Point::new(50.0, 9.0)), 1);
    }

    #[test]
    fn test_eraser_text_box() {
        let mut scene = Scene::new();
        scene.push(Element::Text(TextElement::new(
            Point::new(0.0, 20.0),
            "abc".to_string(),
            CssColor::black(),
            20.0,
        )));
        assert_eq!(scene.erase_at(Point::new(37.0, 10.0)), 0);
        assert_eq!(scene.erase_at(Point::new(30.0, 10.0)), 1);
    }

    #[test]
    fn test_elements_at_front_to_back() {
        let mut scene = Scene::new();
        scene.push(rect(0.0, 0.0, 10.0, 10.0));
        scene.push(rect(50.0, 50.0, 10.0, 10.0));
        scene.push(rect(0.0, 0.0, 20.0, 20.0));
        assert_eq!(scene.elements_at(Point::new(5.0, 5.0)), vec![2, 0]);
        assert!(scene.elements_at(Point::new(500.0, 5.0)).is_empty());
    }

    #[test]
    fn test_bounds() {
        let mut scene = Scene::new();
        assert!(scene.bounds().is_none());

        scene.push(rect(0.0, 0.0, 10.0, 10.0));
        scene.push(rect(50.0, 50.0, -20.0, 30.0));
        let bounds = scene.bounds().unwrap();
        assert!((bounds.x0).abs() < f64::EPSILON);
        assert!((bounds.y0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 50.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_json_is_bare_array() {
        let mut scene = Scene::new();
        scene.push(path_through(&[(10.0, 10.0), (20.0, 10.0)]));
        let json = scene.to_json().unwrap();
        assert!(json.starts_with('['));

        let back = Scene::from_json(&json).unwrap();
        assert_eq!(back, scene);
        assert_eq!(Scene::from_json("[]").unwrap(), Scene::new());
    }
}
