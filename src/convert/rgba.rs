//! Plane slicing and the SIMD color-space transform.
//!
//! Camera frames carry full-range BT.601 YUV (the JFIF transform), so
//! both entry points hand that matrix to the `yuv` kernels.

use super::ConvertError;
use yuv::{
    yuv420_to_rgba, yuv_nv21_to_rgba, YuvBiPlanarImage, YuvConversionMode, YuvPlanarImage,
    YuvRange, YuvStandardMatrix,
};

/// Converts an NV21 payload (luma plane + interleaved VU plane) to
/// packed RGBA. The caller has already validated the payload length.
pub(super) fn nv21_to_rgba(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ConvertError> {
    let luma_len = width as usize * height as usize;
    let y_plane = &data[..luma_len];
    let vu_plane = &data[luma_len..];

    let image = YuvBiPlanarImage {
        y_plane,
        y_stride: width,
        uv_plane: vu_plane,
        uv_stride: width,
        width,
        height,
    };

    let mut rgba = vec![0u8; luma_len * 4];
    yuv_nv21_to_rgba(
        &image,
        &mut rgba,
        width * 4,
        YuvRange::Full,
        YuvStandardMatrix::Bt601,
        YuvConversionMode::Balanced,
    )
    .map_err(|e| ConvertError::Conversion(format!("{e:?}")))?;

    Ok(rgba)
}

/// Converts a YV12 payload (luma plane, then V plane, then U plane) to
/// packed RGBA. The caller has already validated the payload length.
pub(super) fn yv12_to_rgba(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ConvertError> {
    let luma_len = width as usize * height as usize;
    let chroma_len = luma_len / 4;
    // YV12 orders V before U
    let y_plane = &data[..luma_len];
    let v_plane = &data[luma_len..luma_len + chroma_len];
    let u_plane = &data[luma_len + chroma_len..luma_len + 2 * chroma_len];

    let image = YuvPlanarImage {
        y_plane,
        y_stride: width,
        u_plane,
        u_stride: width / 2,
        v_plane,
        v_stride: width / 2,
        width,
        height,
    };

    let mut rgba = vec![0u8; luma_len * 4];
    yuv420_to_rgba(
        &image,
        &mut rgba,
        width * 4,
        YuvRange::Full,
        YuvStandardMatrix::Bt601,
    )
    .map_err(|e| ConvertError::Conversion(format!("{e:?}")))?;

    Ok(rgba)
}
