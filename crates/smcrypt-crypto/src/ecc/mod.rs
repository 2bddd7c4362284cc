//! Elliptic curve core for SM2.
//!
//! Provides the SM2 recommended curve, affine points with SEC1-style
//! encodings (uncompressed `04 || x || y`, compressed `02/03 || x`) and the
//! Jacobian arithmetic the signature and encryption schemes are built on.

mod curve;
pub(crate) mod point;

pub use curve::{Sm2Curve, FIELD_SIZE};
pub(crate) use curve::{A, B, GX, GY};

use smcrypt_bignum::BigNum;
use smcrypt_types::{CryptoError, PointFormat};

use point::JacobianPoint;

/// Uncompressed encoding length: prefix byte plus two coordinates.
pub const UNCOMPRESSED_POINT_SIZE: usize = 1 + 2 * FIELD_SIZE;
/// Compressed encoding length: prefix byte plus the x-coordinate.
pub const COMPRESSED_POINT_SIZE: usize = 1 + FIELD_SIZE;

const TAG_UNCOMPRESSED: u8 = 0x04;
const TAG_EVEN_Y: u8 = 0x02;
const TAG_ODD_Y: u8 = 0x03;

/// An affine point on the SM2 curve (never the point at infinity).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcPoint {
    pub(crate) x: BigNum,
    pub(crate) y: BigNum,
}

impl EcPoint {
    /// Create a point from big-endian coordinates, checking it lies on the
    /// curve.
    pub fn new(x: &[u8], y: &[u8]) -> Result<Self, CryptoError> {
        if x.len() > FIELD_SIZE || y.len() > FIELD_SIZE {
            return Err(CryptoError::EccInvalidPublicKey);
        }
        let point = EcPoint {
            x: BigNum::from_bytes_be(x),
            y: BigNum::from_bytes_be(y),
        };
        if !Sm2Curve::get().contains(&point.x, &point.y)? {
            return Err(CryptoError::EccPointNotOnCurve);
        }
        Ok(point)
    }

    /// The base point G.
    pub fn generator() -> Self {
        let curve = Sm2Curve::get();
        EcPoint {
            x: curve.gx.clone(),
            y: curve.gy.clone(),
        }
    }

    /// Compute k·G for a scalar in [1, n-1].
    pub fn mul_base(k: &BigNum) -> Result<Self, CryptoError> {
        let curve = Sm2Curve::get();
        curve.to_affine(&curve.scalar_mul_base(k)?)
    }

    /// Compute k·self.
    pub fn mul(&self, k: &BigNum) -> Result<Self, CryptoError> {
        let curve = Sm2Curve::get();
        curve.to_affine(&curve.scalar_mul(k, &JacobianPoint::from_affine(self))?)
    }

    /// The x-coordinate as 32 big-endian bytes.
    pub fn x_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        self.x.to_bytes_be_padded(FIELD_SIZE)
    }

    /// The y-coordinate as 32 big-endian bytes.
    pub fn y_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        self.y.to_bytes_be_padded(FIELD_SIZE)
    }

    /// Check the curve equation.
    pub fn is_on_curve(&self) -> Result<bool, CryptoError> {
        Sm2Curve::get().contains(&self.x, &self.y)
    }

    /// Encode as `04 || x || y`.
    pub fn to_uncompressed(&self) -> Result<Vec<u8>, CryptoError> {
        let mut out = Vec::with_capacity(UNCOMPRESSED_POINT_SIZE);
        out.push(TAG_UNCOMPRESSED);
        out.extend_from_slice(&self.x_bytes()?);
        out.extend_from_slice(&self.y_bytes()?);
        Ok(out)
    }

    /// Encode as `02 || x` (even y) or `03 || x` (odd y).
    pub fn to_compressed(&self) -> Result<Vec<u8>, CryptoError> {
        let mut out = Vec::with_capacity(COMPRESSED_POINT_SIZE);
        out.push(if self.y.is_odd() { TAG_ODD_Y } else { TAG_EVEN_Y });
        out.extend_from_slice(&self.x_bytes()?);
        Ok(out)
    }

    /// Encode in the requested format.
    pub fn encode(&self, format: PointFormat) -> Result<Vec<u8>, CryptoError> {
        match format {
            PointFormat::Uncompressed => self.to_uncompressed(),
            PointFormat::Compressed => self.to_compressed(),
        }
    }

    /// Decode an uncompressed or compressed point and validate it.
    ///
    /// Wrong length or prefix is `EccInvalidPublicKey`; a well-formed
    /// encoding off the curve (or an x with no matching y) is
    /// `EccPointNotOnCurve`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CryptoError> {
        match (data.first(), data.len()) {
            (Some(&TAG_UNCOMPRESSED), UNCOMPRESSED_POINT_SIZE) => {
                Self::new(&data[1..1 + FIELD_SIZE], &data[1 + FIELD_SIZE..])
            }
            (Some(&tag @ (TAG_EVEN_Y | TAG_ODD_Y)), COMPRESSED_POINT_SIZE) => {
                Self::decompress(&data[1..], tag == TAG_ODD_Y)
            }
            _ => Err(CryptoError::EccInvalidPublicKey),
        }
    }

    fn decompress(x: &[u8], odd: bool) -> Result<Self, CryptoError> {
        let curve = Sm2Curve::get();
        let x = BigNum::from_bytes_be(x);
        if x >= curve.p {
            return Err(CryptoError::EccPointNotOnCurve);
        }
        let rhs = curve.rhs(&x)?;
        let root = curve
            .sqrt(&rhs)?
            .ok_or(CryptoError::EccPointNotOnCurve)?;
        let y = if root.is_odd() == odd {
            root
        } else {
            // y = 0 has no opposite-parity partner.
            curve
                .p
                .checked_sub(&root)
                .filter(|y| !root.is_zero() && y.is_odd() == odd)
                .ok_or(CryptoError::EccPointNotOnCurve)?
        };
        Ok(EcPoint { x, y })
    }
}
