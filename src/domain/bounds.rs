use crate::domain::Coordinate;

/// The smallest latitude/longitude box containing a set of coordinates.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn enclosing(path: &[Coordinate]) -> Option<Bounds> {
        let (first, rest) = path.split_first()?;
        let start = Bounds {
            south: first.latitude(),
            west: first.longitude(),
            north: first.latitude(),
            east: first.longitude(),
        };

        Some(rest.iter().fold(start, |bounds, coordinate| Bounds {
            south: bounds.south.min(coordinate.latitude()),
            west: bounds.west.min(coordinate.longitude()),
            north: bounds.north.max(coordinate.latitude()),
            east: bounds.east.max(coordinate.longitude()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn enclosing_returns_none_for_an_empty_path() {
        assert_eq!(Bounds::enclosing(&[]), None);
    }

    #[test]
    fn enclosing_spans_all_coordinates() {
        let path = vec![
            Coordinate::new(-6.2, 106.8).unwrap(),
            Coordinate::new(-6.6, 106.9).unwrap(),
            Coordinate::new(-6.4, 106.7).unwrap(),
        ];

        let bounds = Bounds::enclosing(&path).unwrap();

        assert_eq!(
            bounds,
            Bounds {
                south: -6.6,
                west: 106.7,
                north: -6.2,
                east: 106.9,
            }
        );
    }
}
