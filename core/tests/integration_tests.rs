use serde_json::json;
use xrd_crd_core::{
    ClaimNameError, CompositeResourceDefinition, Condition, ConditionStatus,
    CustomResourceDefinition, DefinitionVariant, DefinitionVersion, GenerateError, NameField,
    RawSchema, ResourceNames, ResourceScope, for_composite_resource, for_composite_resource_claim,
    generate, is_established, spec_properties,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const XRD_YAML: &str = r#"
apiVersion: apiextensions.crossplane.io/v1alpha1
kind: CompositeResourceDefinition
metadata:
  name: xpostgresqlinstances.database.example.org
  uid: 6f1e9b1c-5a1f-4b9e-9d7e-0c4f0a3c2d11
  labels:
    provider: gcp
  annotations:
    owner: data-platform
spec:
  group: database.example.org
  names:
    kind: XPostgreSQLInstance
    plural: xpostgresqlinstances
    singular: xpostgresqlinstance
    listKind: XPostgreSQLInstanceList
  claimNames:
    kind: PostgreSQLInstance
    plural: postgresqlinstances
    singular: postgresqlinstance
    listKind: PostgreSQLInstanceList
  versions:
  - name: v1alpha1
    served: true
    referenceable: false
  - name: v1beta1
    served: false
    referenceable: true
    additionalPrinterColumns:
    - name: STORAGE
      type: integer
      jsonPath: .spec.parameters.storageGB
    schema:
      openAPIV3Schema:
        type: object
        properties:
          spec:
            type: object
            properties:
              parameters:
                type: object
                properties:
                  storageGB:
                    type: integer
                required:
                - storageGB
            required:
            - parameters
"#;

fn load_xrd() -> CompositeResourceDefinition {
    serde_yaml::from_str(XRD_YAML).expect("fixture should parse")
}

fn version_summary(crd: &CustomResourceDefinition) -> Vec<(&str, bool, bool)> {
    crd.spec
        .versions
        .iter()
        .map(|v| (v.name.as_str(), v.served, v.storage))
        .collect()
}

// ---------------------------------------------------------------------------
// Composite CRD
// ---------------------------------------------------------------------------

#[test]
fn composite_crd_from_manifest() {
    let xrd = load_xrd();
    let crd = for_composite_resource(&xrd).unwrap();

    assert_eq!(crd.metadata.name, "xpostgresqlinstances.database.example.org");
    assert_eq!(crd.metadata.labels["provider"], "gcp");
    assert_eq!(crd.metadata.annotations["owner"], "data-platform");
    assert_eq!(crd.spec.scope, ResourceScope::Cluster);
    assert_eq!(crd.spec.names.list_kind, "XPostgreSQLInstanceList");
    assert_eq!(crd.spec.names.categories, vec!["composite"]);

    let owner = &crd.metadata.owner_references[0];
    assert_eq!(owner.kind, "CompositeResourceDefinition");
    assert_eq!(owner.uid, "6f1e9b1c-5a1f-4b9e-9d7e-0c4f0a3c2d11");
    assert_eq!(owner.controller, Some(true));
}

#[test]
fn versions_map_one_to_one_in_order() {
    let xrd = load_xrd();
    let expected = vec![("v1alpha1", true, false), ("v1beta1", false, true)];

    for variant in DefinitionVariant::ALL {
        let crd = generate(&xrd, variant).unwrap();
        assert_eq!(version_summary(&crd), expected, "{variant}");
        assert!(
            crd.spec
                .versions
                .iter()
                .all(|v| v.status_subresource_enabled())
        );
    }
}

#[test]
fn storage_version_is_the_referenceable_one() {
    let crd = for_composite_resource(&load_xrd()).unwrap();
    assert_eq!(crd.storage_version().map(|v| v.name.as_str()), Some("v1beta1"));
    assert!(crd.version("v1alpha1").is_some());
    assert!(crd.version("v2").is_none());
}

#[test]
fn caller_schema_is_nested_under_spec() {
    let crd = for_composite_resource(&load_xrd()).unwrap();
    let schema = serde_json::to_value(crd.version("v1beta1").unwrap().open_api_schema()).unwrap();

    assert_eq!(schema["type"], "object");
    assert_eq!(
        schema["properties"]["spec"]["properties"]["parameters"],
        json!({
            "type": "object",
            "properties": {"storageGB": {"type": "integer"}},
            "required": ["storageGB"]
        })
    );
    assert_eq!(
        schema["properties"]["status"]["properties"]["conditions"]["type"],
        "array"
    );
}

#[test]
fn composite_crd_serializes_to_api_shape() {
    let crd = for_composite_resource(&load_xrd()).unwrap();
    let value = serde_json::to_value(&crd).unwrap();

    assert_eq!(value["apiVersion"], "apiextensions.k8s.io/v1");
    assert_eq!(value["kind"], "CustomResourceDefinition");
    assert_eq!(value["spec"]["scope"], "Cluster");
    assert_eq!(value["spec"]["versions"][1]["subresources"], json!({"status": {}}));
    assert_eq!(
        value["spec"]["versions"][1]["additionalPrinterColumns"][0]["jsonPath"],
        ".spec.parameters.storageGB"
    );
    assert!(value.get("status").is_none());

    let back: CustomResourceDefinition = serde_json::from_value(value).unwrap();
    assert_eq!(back, crd);
}

// ---------------------------------------------------------------------------
// Claim CRD
// ---------------------------------------------------------------------------

#[test]
fn claim_crd_from_manifest() {
    let crd = for_composite_resource_claim(&load_xrd()).unwrap();

    assert_eq!(crd.metadata.name, "postgresqlinstances.database.example.org");
    assert_eq!(crd.spec.scope, ResourceScope::Namespaced);
    assert_eq!(crd.spec.names.kind, "PostgreSQLInstance");
    assert_eq!(crd.spec.names.categories, vec!["claim"]);
    assert_eq!(
        serde_json::to_value(&crd).unwrap()["spec"]["scope"],
        "Namespaced"
    );
}

#[test]
fn claim_without_names_is_rejected() {
    let mut xrd = load_xrd();
    xrd.spec.claim_names = None;

    assert!(matches!(
        for_composite_resource_claim(&xrd),
        Err(GenerateError::InvalidClaimNames(
            ClaimNameError::MissingClaimNames
        ))
    ));
    // The composite CRD does not need claim names.
    assert!(for_composite_resource(&xrd).is_ok());
}

#[test]
fn claim_with_composite_list_kind_is_rejected() {
    let mut xrd = load_xrd();
    if let Some(claim) = xrd.spec.claim_names.as_mut() {
        claim.list_kind = "XPostgreSQLInstanceList".to_string();
    }

    match for_composite_resource_claim(&xrd) {
        Err(GenerateError::InvalidClaimNames(ClaimNameError::NameConflict { field, value })) => {
            assert_eq!(field, NameField::ListKind);
            assert_eq!(value, "XPostgreSQLInstanceList");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Schema handling
// ---------------------------------------------------------------------------

#[test]
fn spec_properties_sample_document() {
    let raw = RawSchema::from_bytes(
        r#"{"properties":{"spec":{"properties":{"foo":{"type":"string"}}}}}"#,
    );
    let props = spec_properties(Some(&raw)).unwrap();
    assert_eq!(props.len(), 1);
    assert_eq!(props["foo"].schema_type.as_deref(), Some("string"));
}

#[test]
fn malformed_schema_yields_no_output() {
    let xrd = CompositeResourceDefinition::new(
        "xs.example.org",
        "example.org",
        ResourceNames::new("X", "xs"),
    )
    .with_claim_names(ResourceNames::new("Y", "ys"))
    .with_version(DefinitionVersion::new("v1").with_referenceable(true))
    .with_version(DefinitionVersion::new("v2").with_schema(RawSchema::from_bytes("[")));

    for variant in DefinitionVariant::ALL {
        match generate(&xrd, variant) {
            Err(GenerateError::GetSpecPropsFailure { version, .. }) => assert_eq!(version, "v2"),
            other => panic!("unexpected result for {variant}: {other:?}"),
        }
    }
}

#[test]
fn generation_is_repeatable() {
    let xrd = load_xrd();
    let first = serde_json::to_string(&for_composite_resource(&xrd).unwrap()).unwrap();
    let second = serde_json::to_string(&for_composite_resource(&xrd).unwrap()).unwrap();
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Establishment
// ---------------------------------------------------------------------------

#[test]
fn generated_crd_is_established_once_reported() {
    let mut crd = for_composite_resource(&load_xrd()).unwrap();
    assert!(!crd.is_established());

    crd.status = Some(serde_json::from_value(json!({
        "conditions": [
            {"type": "NamesAccepted", "status": "True"},
            {"type": "Established", "status": "True"}
        ]
    }))
    .unwrap());
    assert!(crd.is_established());
}

#[test]
fn established_requires_true_status() {
    assert!(!is_established(&[Condition::new(
        "Established",
        ConditionStatus::Unknown
    )]));
    assert!(is_established(&[Condition::new(
        "Established",
        ConditionStatus::True
    )]));
}
