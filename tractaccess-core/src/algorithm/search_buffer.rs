use geo::{coord, Rect};

/// rectangular search area around a point, `radius_miles` in each direction,
/// converting miles to degrees with a constant factor on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchBuffer {
    pub rect: Rect<f64>,
}

impl SearchBuffer {
    pub fn around(
        latitude: f64,
        longitude: f64,
        radius_miles: f64,
        miles_per_degree: f64,
    ) -> SearchBuffer {
        let delta = radius_miles / miles_per_degree;
        let rect = Rect::new(
            coord! { x: longitude - delta, y: latitude - delta },
            coord! { x: longitude + delta, y: latitude + delta },
        );
        SearchBuffer { rect }
    }

    /// true when the point lies strictly inside the buffer. points on the
    /// boundary are outside.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        let min = self.rect.min();
        let max = self.rect.max();
        min.x < longitude && longitude < max.x && min.y < latitude && latitude < max.y
    }

    /// the items inside the buffer, in input order
    pub fn select<'a, T>(
        &self,
        items: impl IntoIterator<Item = &'a T>,
        location: impl Fn(&T) -> (f64, f64),
    ) -> Vec<&'a T>
    where
        T: 'a,
    {
        items
            .into_iter()
            .filter(|item| {
                let (lat, lon) = location(item);
                self.contains(lat, lon)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_buffer_extent() {
        let buffer = SearchBuffer::around(35.0, -79.0, 69.0, 69.0);
        assert_relative_eq!(buffer.rect.min().x, -80.0);
        assert_relative_eq!(buffer.rect.max().y, 36.0);
        assert!(buffer.contains(35.5, -79.5));
        assert!(!buffer.contains(36.0, -79.0));
        assert!(!buffer.contains(34.0, -81.0));
    }

    #[test]
    fn test_select_keeps_order() {
        let points = vec![(35.1, -79.1), (40.0, -79.0), (34.9, -78.9)];
        let buffer = SearchBuffer::around(35.0, -79.0, 30.0, 69.0);
        let selected = buffer.select(points.iter(), |p| *p);
        assert_eq!(selected, vec![&(35.1, -79.1), &(34.9, -78.9)]);
    }
}
