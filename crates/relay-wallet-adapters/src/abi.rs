use std::str::FromStr;

use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::primitives::{keccak256, Address, Bytes, B256, I256, U256};

use relay_wallet_core::{AbiPort, PortError};

/// Encodes user-typed calls such as `transfer(address,uint256)` with
/// `0xabc...,100`. Only flat types are accepted, and string values may not
/// contain commas.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbiAdapter;

/// A function signature in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSignature {
    pub canonical: String,
    pub types: Vec<DynSolType>,
}

impl AbiPort for AbiAdapter {
    fn selector(&self, signature: &str) -> Result<[u8; 4], PortError> {
        let parsed = parse_signature(signature)?;
        Ok(selector_of(&parsed.canonical))
    }

    fn encode_function_call(&self, signature: &str, values: &str) -> Result<Bytes, PortError> {
        let parsed = parse_signature(signature)?;
        let raw_values = split_values(values);
        if raw_values.len() != parsed.types.len() {
            return Err(PortError::Validation(format!(
                "argument count mismatch: {} expects {}, got {}",
                parsed.canonical,
                parsed.types.len(),
                raw_values.len()
            )));
        }

        let mut args = Vec::with_capacity(raw_values.len());
        for (idx, (raw, ty)) in raw_values.iter().zip(parsed.types.iter()).enumerate() {
            let value = parse_dyn_value(raw, ty).map_err(|e| {
                PortError::Validation(format!(
                    "argument {} ({}) parse failed: {e}",
                    idx + 1,
                    ty.sol_type_name()
                ))
            })?;
            args.push(value);
        }

        let mut calldata = selector_of(&parsed.canonical).to_vec();
        if !args.is_empty() {
            calldata.extend_from_slice(&DynSolValue::Tuple(args).abi_encode_params());
        }
        Ok(Bytes::from(calldata))
    }
}

fn selector_of(canonical: &str) -> [u8; 4] {
    let hash = keccak256(canonical.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_slice()[0..4]);
    selector
}

pub fn parse_signature(signature: &str) -> Result<ParsedSignature, PortError> {
    let trimmed = signature.trim();
    let (name, rest) = trimmed
        .split_once('(')
        .ok_or_else(|| PortError::Validation(format!("expected name(type,...), got '{trimmed}'")))?;
    let name = name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(PortError::Validation(format!("invalid function name '{name}'")));
    }
    let inner = rest
        .strip_suffix(')')
        .ok_or_else(|| PortError::Validation(format!("unterminated signature '{trimmed}'")))?;

    let mut types = Vec::new();
    if !inner.trim().is_empty() {
        for raw in inner.split(',') {
            let raw = raw.trim();
            if raw.contains(['(', ')', '[', ']']) {
                return Err(PortError::Validation(format!(
                    "nested, tuple and array types are not supported: '{raw}'"
                )));
            }
            let ty: DynSolType = raw
                .parse()
                .map_err(|e| PortError::Validation(format!("unsupported type '{raw}': {e}")))?;
            types.push(ty);
        }
    }

    let canonical = format!(
        "{name}({})",
        types
            .iter()
            .map(|t| t.sol_type_name().into_owned())
            .collect::<Vec<_>>()
            .join(",")
    );
    Ok(ParsedSignature { canonical, types })
}

fn split_values(values: &str) -> Vec<&str> {
    if values.trim().is_empty() {
        return Vec::new();
    }
    values
        .split(',')
        .map(|v| {
            let v = v.trim();
            v.strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .unwrap_or(v)
        })
        .collect()
}

fn parse_dyn_value(raw: &str, ty: &DynSolType) -> Result<DynSolValue, String> {
    match ty {
        DynSolType::Bool => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(DynSolValue::Bool(true)),
            "false" | "0" => Ok(DynSolValue::Bool(false)),
            _ => Err("expected bool".to_owned()),
        },
        DynSolType::Uint(bits) => {
            let x = U256::from_str(raw).map_err(|e| format!("invalid uint: {e}"))?;
            if *bits < 256 && x.bit_len() > *bits {
                return Err(format!("value does not fit in uint{bits}"));
            }
            Ok(DynSolValue::Uint(x, *bits))
        }
        DynSolType::Int(bits) => {
            let x = I256::from_str(raw).map_err(|e| format!("invalid int: {e}"))?;
            if *bits < 256 {
                let limit = I256::from_raw(U256::from(1u8) << (*bits - 1));
                if x >= limit || x < -limit {
                    return Err(format!("value does not fit in int{bits}"));
                }
            }
            Ok(DynSolValue::Int(x, *bits))
        }
        DynSolType::Address => Address::from_str(raw)
            .map(DynSolValue::Address)
            .map_err(|e| format!("invalid address: {e}")),
        DynSolType::FixedBytes(size) => {
            let bytes = Bytes::from_str(raw).map_err(|e| format!("invalid fixed bytes: {e}"))?;
            if bytes.len() != *size {
                return Err(format!("expected {size} bytes, got {}", bytes.len()));
            }
            let mut word = B256::ZERO;
            word[..*size].copy_from_slice(&bytes);
            Ok(DynSolValue::FixedBytes(word, *size))
        }
        DynSolType::Bytes => Bytes::from_str(raw)
            .map(|x| DynSolValue::Bytes(x.into()))
            .map_err(|e| format!("invalid bytes: {e}")),
        DynSolType::String => Ok(DynSolValue::String(raw.to_owned())),
        _ => Err("type not supported".to_owned()),
    }
}
