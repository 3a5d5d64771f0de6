pub(crate) mod rounded_corners;
