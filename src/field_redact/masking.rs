// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Masking strategies for single scalar values
//
// All positions are counted in chars, never bytes, so multi-byte text keeps
// its character count after masking.

use super::config::{MaskParams, StrategyKind};

/// Apply a strategy to one value
///
/// # Arguments
/// * `value` - Scalar text to mask
/// * `strategy` - Strategy named by the matching rule
/// * `params` - Keep-counts and mask char, already resolved against defaults
///
/// # Returns
/// Masked text; empty input is returned unchanged by every strategy
pub fn apply_strategy(value: &str, strategy: StrategyKind, params: MaskParams) -> String {
    let start = params.start_keep as usize;
    let end = params.end_keep as usize;
    let mask_char = params.mask_char;

    match strategy {
        StrategyKind::Username | StrategyKind::ChineseName | StrategyKind::Custom => {
            mask(value, start, end, mask_char)
        }
        StrategyKind::IdCard
        | StrategyKind::Phone
        | StrategyKind::BankCard
        | StrategyKind::Address => mask_with_threshold(value, start, end, mask_char),
        StrategyKind::Email => mask_email(value, mask_char),
        StrategyKind::Password => mask_password(value, mask_char),
    }
}

/// Generic keep-ends masking
///
/// Too-short values (`n <= start_keep + end_keep`) still reveal their first
/// and last char when longer than 2; values of 1 or 2 chars are fully masked.
pub fn mask(value: &str, start_keep: usize, end_keep: usize, mask_char: char) -> String {
    if value.is_empty() {
        return String::new();
    }

    let len = value.chars().count();
    if len <= start_keep.saturating_add(end_keep) {
        if len <= 2 {
            return repeat_mask(mask_char, len);
        }
        return keep_ends(value, len, 1, 1, mask_char);
    }

    keep_ends(value, len, start_keep, end_keep, mask_char)
}

/// Keep-ends masking for the fixed-format strategies (ID card, phone, bank
/// card, address): anything not longer than `start_keep + end_keep` is fully
/// masked instead of revealing its first and last char.
///
/// The threshold follows the keep-counts passed in, so a per-rule override
/// also moves the full-mask length.
pub fn mask_with_threshold(
    value: &str,
    start_keep: usize,
    end_keep: usize,
    mask_char: char,
) -> String {
    let len = value.chars().count();
    if len <= start_keep.saturating_add(end_keep) {
        return repeat_mask(mask_char, len);
    }

    keep_ends(value, len, start_keep, end_keep, mask_char)
}

/// Email masking: j*******@example.com
///
/// Only the first char of the local part survives; a one-char local part is
/// replaced by three mask chars. Values without an `@` after the first char
/// are returned unchanged.
pub fn mask_email(value: &str, mask_char: char) -> String {
    let at_byte = match value.find('@') {
        Some(idx) if idx > 0 => idx,
        _ => return value.to_string(),
    };

    let (local, domain) = value.split_at(at_byte);
    let local_len = local.chars().count();

    let mut result = String::with_capacity(value.len() + 2);
    if local_len <= 1 {
        result.push_str(&repeat_mask(mask_char, local_len.max(3)));
    } else {
        result.extend(local.chars().take(1));
        result.push_str(&repeat_mask(mask_char, local_len - 1));
    }
    result.push_str(domain);
    result
}

/// Password masking: every char hidden
pub fn mask_password(value: &str, mask_char: char) -> String {
    repeat_mask(mask_char, value.chars().count())
}

/// `count` copies of the mask char; zero yields an empty string
pub fn repeat_mask(mask_char: char, count: usize) -> String {
    std::iter::repeat(mask_char).take(count).collect()
}

/// Byte offset of the char at `chars`, clamped to the end of the string
fn byte_offset(value: &str, chars: usize) -> usize {
    value
        .char_indices()
        .nth(chars)
        .map_or(value.len(), |(idx, _)| idx)
}

fn keep_ends(value: &str, len: usize, start_keep: usize, end_keep: usize, mask_char: char) -> String {
    let head_end = byte_offset(value, start_keep.min(len));
    let tail_start = byte_offset(value, len.saturating_sub(end_keep)).max(head_end);
    let masked = len.saturating_sub(start_keep.saturating_add(end_keep));

    let mut result = String::with_capacity(value.len() + masked);
    result.push_str(&value[..head_end]);
    result.push_str(&repeat_mask(mask_char, masked));
    result.push_str(&value[tail_start..]);
    result
}
