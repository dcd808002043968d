use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

/// Absolute on-screen rectangle of a UI element, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct DisplayRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DisplayRegion {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Centre point, where an agent would aim a click.
    pub fn center(&self) -> (i32, i32) {
        let cx = i64::from(self.x) + i64::from(self.width) / 2;
        let cy = i64::from(self.y) + i64::from(self.height) / 2;
        (clamp_i32(cx), clamp_i32(cy))
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Whether a UI feature is currently rendered in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility<T> {
    NotVisible,
    Visible(T),
}

impl<T> Visibility<T> {
    pub fn is_visible(&self) -> bool {
        matches!(self, Visibility::Visible(_))
    }

    pub fn visible(&self) -> Option<&T> {
        match self {
            Visibility::Visible(v) => Some(v),
            Visibility::NotVisible => None,
        }
    }

    /// Borrow the value, keeping the visibility flag.
    pub fn as_visible_ref(&self) -> Visibility<&T> {
        match self {
            Visibility::Visible(v) => Visibility::Visible(v),
            Visibility::NotVisible => Visibility::NotVisible,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Visibility<U> {
        match self {
            Visibility::Visible(v) => Visibility::Visible(f(v)),
            Visibility::NotVisible => Visibility::NotVisible,
        }
    }
}

impl<T> From<Option<T>> for Visibility<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Visibility::Visible(v),
            None => Visibility::NotVisible,
        }
    }
}

impl<T: Serialize> Serialize for Visibility<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Visibility::NotVisible => {
                let mut state = serializer.serialize_struct("Visibility", 1)?;
                state.serialize_field("visible", &false)?;
                state.end()
            }
            Visibility::Visible(value) => {
                let mut state = serializer.serialize_struct("Visibility", 2)?;
                state.serialize_field("visible", &true)?;
                state.serialize_field("value", value)?;
                state.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_edges_and_center() {
        let r = DisplayRegion::new(10, 20, 100, 50);
        assert_eq!(r.right(), 110);
        assert_eq!(r.bottom(), 70);
        assert_eq!(r.center(), (60, 45));
        assert!(r.contains(10, 20));
        assert!(!r.contains(110, 20));
    }

    #[test]
    fn test_visibility_from_option() {
        assert_eq!(Visibility::from(Some(3)), Visibility::Visible(3));
        assert_eq!(Visibility::<i32>::from(None), Visibility::NotVisible);
        assert_eq!(Visibility::Visible(2).map(|v| v * 2).visible(), Some(&4));
    }

    #[test]
    fn test_visibility_as_visible_ref() {
        let shown = Visibility::Visible(String::from("Warp"));
        assert_eq!(shown.as_visible_ref().map(String::len), Visibility::Visible(4));
        assert_eq!(
            Visibility::<String>::NotVisible.as_visible_ref(),
            Visibility::NotVisible
        );
        assert!(shown.is_visible());
    }

    #[test]
    fn test_visibility_serializes_with_flag() {
        let shown = serde_json::to_value(Visibility::Visible(1)).unwrap();
        assert_eq!(shown, serde_json::json!({ "visible": true, "value": 1 }));
        let hidden = serde_json::to_value(Visibility::<i32>::NotVisible).unwrap();
        assert_eq!(hidden, serde_json::json!({ "visible": false }));
    }
}
