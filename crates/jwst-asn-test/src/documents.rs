//! Raw JSON association documents.

use serde_json::{json, Value};

/// A valid `spec2` document with one product of two members.
pub fn valid_document() -> Value {
    json!({
        "asn_type": "spec2",
        "asn_rule": "Asn_Lv2Spec",
        "asn_id": "o001",
        "asn_pool": "test_pool",
        "program": "00623",
        "products": [{
            "name": "test_lrs2",
            "members": [
                {"expname": "test_lrs2_rate.fits", "exptype": "SCIENCE"},
                {"expname": "test_lrs2bkg_rate.fits", "exptype": "BACKGROUND"}
            ]
        }]
    })
}

/// Product 1 of 2 carries two SCIENCE members.
pub fn two_science_document() -> Value {
    json!({
        "asn_type": "spec2",
        "products": [
            {"name": "good", "members": [
                {"expname": "good_rate.fits", "exptype": "SCIENCE"}
            ]},
            {"name": "bad", "members": [
                {"expname": "bad1_rate.fits", "exptype": "SCIENCE"},
                {"expname": "bad2_rate.fits", "exptype": "SCIENCE"}
            ]}
        ]
    })
}

/// Missing `members`, an unknown exposure type and an empty filename.
pub fn schema_broken_document() -> Value {
    json!({
        "products": [
            {"name": "no_members"},
            {"members": [
                {"expname": "", "exptype": "SCIENCE"},
                {"expname": "x_rate.fits", "exptype": "TARGET"}
            ]}
        ]
    })
}
