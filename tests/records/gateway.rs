//! Validation, strict creation and text construction

use crate::common::*;
use immutable_records::{
    create_from_instance, create_from_text, create_with, DecodeError, Error, Gateway,
    GatewayConfig, Instance, TokenUnwrap, Value,
};

// ============================================================================
// Whitelist validation
// ============================================================================

mod validation {
    use super::*;

    #[test]
    fn invalid_definition_names_offending_type() {
        let err = Instance::<InvalidDefinition>::new().unwrap_err();
        match err {
            Error::TypeDefinition(e) => {
                assert_eq!(e.type_name, "InvalidDefinition");
                assert_eq!(e.invalid_types, vec!["Vec".to_string()]);
            }
            other => panic!("Wrong error variant: {other:?}"),
        }
    }

    #[test]
    fn invalid_definition_fails_every_construction_path() {
        assert!(matches!(
            create_from_text::<InvalidDefinition>(r#"{"name":"x"}"#),
            Err(Error::TypeDefinition(_))
        ));
        assert!(matches!(
            create_with::<InvalidDefinition, _>(|_| Ok(())),
            Err(Error::TypeDefinition(_))
        ));
    }

    #[test]
    fn generic_arguments_of_named_types_are_checked() {
        let err = Instance::<NestedInvalidDefinition>::new().unwrap_err();
        match err {
            Error::TypeDefinition(e) => assert_eq!(e.invalid_types, vec!["Vec".to_string()]),
            other => panic!("Wrong error variant: {other:?}"),
        }
    }

    #[test]
    fn whitelisted_types_validate() {
        let gateway = Gateway::default();
        gateway.validate::<Person>().unwrap();
        gateway.validate::<Student>().unwrap();
        gateway.validate::<Measurement>().unwrap();
    }

    #[test]
    fn configured_extra_type_is_accepted() {
        let config = GatewayConfig::from_toml_str(r#"extra_allowed_types = ["Vec"]"#).unwrap();
        let gateway = Gateway::new(config);
        let mut record = Instance::<InvalidDefinition>::new_in(&gateway).unwrap();
        record.try_set("aliases", vec!["Jack", "Johnny"]).unwrap();
        assert_eq!(
            record.get("aliases"),
            Some(&Value::from(vec!["Jack", "Johnny"]))
        );
    }
}

// ============================================================================
// Strict creation
// ============================================================================

mod strict_creation {
    use super::*;

    #[test]
    fn direct_creation_is_refused() {
        assert!(matches!(
            Instance::<StrictPerson>::new(),
            Err(Error::InvalidCreation {
                type_name: "StrictPerson"
            })
        ));
    }

    #[test]
    fn text_creation_is_allowed() {
        let person =
            create_from_text::<StrictPerson>(r#"{"firstName":"John","lastName":"Petersen"}"#)
                .unwrap();
        assert!(person.is_locked());
    }

    #[test]
    fn builder_creation_is_allowed() {
        let person = create_with::<StrictPerson, _>(|p| p.try_set("firstName", "John")).unwrap();
        assert!(person.is_locked());
        assert_eq!(person.get_str("firstName"), Some("John"));
    }

    #[test]
    fn builder_error_aborts_creation() {
        let result = create_with::<StrictPerson, _>(|p| {
            p.try_set("firstName", "John")?;
            p.try_set("firstName", "Jack")
        });
        assert!(matches!(result, Err(Error::AlreadySet { .. })));
    }
}

// ============================================================================
// Construction from instances and text
// ============================================================================

mod construction {
    use super::*;

    #[test]
    fn create_from_instance_locks_partial_instance() {
        let mut person = Instance::<Person>::new().unwrap();
        person.try_set("firstName", "John").unwrap();
        let token = person.token();

        let person = create_from_instance(person).unwrap();
        assert!(person.is_locked());
        assert_eq!(person.token(), token);
    }

    #[test]
    fn unknown_keys_are_ignored_by_default() {
        let person = create_from_text::<Person>(
            r#"{"firstName":"John","lastName":"Petersen","Address":"Main St"}"#,
        )
        .unwrap();
        assert_eq!(person.get_str("lastName"), Some("Petersen"));
    }

    #[test]
    fn unknown_keys_fail_when_denied() {
        let gateway = Gateway::new(GatewayConfig {
            deny_unknown_fields: true,
            ..GatewayConfig::default()
        });
        let err = gateway
            .create_from_text::<Person>(r#"{"firstName":"John","Address":"Main St"}"#)
            .unwrap_err();
        match err {
            Error::Decode(DecodeError::UnknownField { type_name, path }) => {
                assert_eq!(type_name, "Person");
                assert_eq!(path, "Address");
            }
            other => panic!("Wrong error variant: {other:?}"),
        }
    }

    #[test]
    fn shape_errors_report_nested_path() {
        let err = create_from_text::<Student>(
            r#"{"firstName":"Ann","schools":{"MBA":{"name":"Harvard","year":"late"}}}"#,
        )
        .unwrap_err();
        match err {
            Error::Decode(DecodeError::Shape { path, expected, .. }) => {
                assert_eq!(path, "schools.MBA.year");
                assert_eq!(expected, "i32");
            }
            other => panic!("Wrong error variant: {other:?}"),
        }
    }

    #[test]
    fn malformed_text_surfaces_codec_error() {
        assert!(matches!(
            create_from_text::<Person>(r#"{"firstName": "#),
            Err(Error::Decode(DecodeError::Syntax(_)))
        ));
    }

    #[test]
    fn reject_policy_treats_wrapper_as_unknown_key() {
        let wrapped = person("John", "Petersen").to_json(true).unwrap();

        let strict = Gateway::new(GatewayConfig {
            token_unwrap: TokenUnwrap::Reject,
            deny_unknown_fields: true,
            ..GatewayConfig::default()
        });
        assert!(matches!(
            strict.create_from_text::<Person>(&wrapped),
            Err(Error::Decode(DecodeError::UnknownField { .. }))
        ));

        let detecting = Gateway::default();
        let copy = detecting.create_from_text::<Person>(&wrapped).unwrap();
        assert_eq!(copy.get_str("firstName"), Some("John"));
    }
}
