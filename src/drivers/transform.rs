use ndarray::{arr1, arr2, Array2};
/// 4x4 matrices use the row-vector convention: a point is transformed as
/// `[x, y, z, 1] · M`, so translation lives in the last row.
pub type Matrix4 = Array2<f32>;
pub fn identity() -> Matrix4 {
    Array2::eye(4)
}
pub fn translation_matrix(tx: f32, ty: f32, tz: f32) -> Matrix4 {
    arr2(&[
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [tx, ty, tz, 1.0],
    ])
}
pub fn scaling_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4 {
    arr2(&[
        [sx, 0.0, 0.0, 0.0],
        [0.0, sy, 0.0, 0.0],
        [0.0, 0.0, sz, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}
/// `Identity × Scale × Translate`: points are scaled first, then translated.
pub fn scale_translate(scale: [f32; 3], translate: [f32; 3]) -> Matrix4 {
    identity()
        .dot(&scaling_matrix(scale[0], scale[1], scale[2]))
        .dot(&translation_matrix(translate[0], translate[1], translate[2]))
}
pub fn apply(matrix: &Matrix4, point: [f32; 3]) -> [f32; 3] {
    let row = arr1(&[point[0], point[1], point[2], 1.0]).dot(matrix);
    [row[0], row[1], row[2]]
}
