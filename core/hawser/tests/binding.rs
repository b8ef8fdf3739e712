/*
 * Licensed to the Apache Software Foundation (ASF) under one
 * or more contributor license agreements.  See the NOTICE file
 * distributed with this work for additional information
 * regarding copyright ownership.  The ASF licenses this file
 * to you under the Apache License, Version 2.0 (the
 * "License"); you may not use this file except in compliance
 * with the License.  You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing,
 * software distributed under the License is distributed on an
 * "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
 * KIND, either express or implied.  See the License for the
 * specific language governing permissions and limitations
 * under the License.
 */

//! End-to-end binding tests over derived configuration structs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use byte_unit::Byte;
use hawser::{
    bind_enum, Bind, BindError, BindResult, Bindable, Binder, BoundPropertiesHandler,
    EnvPropertySource, HandlerPipeline, IgnoreErrorsHandler, MapPropertySource,
    NoUnboundElementsHandler, PlaceholderMode, PropertyName, PropertySource, Validatable,
    Violations,
};
use serde_json::json;
use strum::{EnumString, VariantNames};

#[derive(Debug, Clone, PartialEq, Bind)]
struct ServerConfig {
    host: String,
    port: u16,
    #[bind(default)]
    read_timeout: Duration,
    #[bind(default)]
    max_payload: Option<Byte>,
}

#[derive(Debug, Clone, PartialEq, Bind)]
struct Endpoint {
    name: String,
    #[bind(default)]
    weight: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Bind)]
#[bind(default)]
struct RetryConfig {
    enabled: bool,
    #[bind(name = "max-attempts")]
    attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, VariantNames)]
#[strum(serialize_all = "kebab-case")]
enum Strategy {
    RoundRobin,
    LeastConnections,
}

bind_enum!(Strategy);

fn map_source(name: &str, pairs: &[(&str, &str)]) -> MapPropertySource {
    MapPropertySource::new(name, pairs.iter().copied())
}

fn binder_over(pairs: &[(&str, &str)]) -> Binder {
    Binder::builder().source(map_source("test", pairs)).build()
}

mod relaxed_names {
    use super::*;

    #[test]
    fn binds_identically_across_naming_conventions() {
        let expected = ServerConfig {
            host: "localhost".to_string(),
            port: 8080,
            read_timeout: Duration::from_secs(10),
            max_payload: None,
        };
        for (host_key, port_key, timeout_key) in [
            ("server.host", "server.port", "server.read-timeout"),
            ("server.host", "server.PORT", "server.read_timeout"),
            ("server.host", "server.port", "server.readTimeout"),
        ] {
            let binder = binder_over(&[
                (host_key, "localhost"),
                (port_key, "8080"),
                (timeout_key, "10s"),
            ]);
            let bound = binder
                .bind::<ServerConfig>("server")
                .unwrap()
                .get()
                .expect("should bind");
            assert_eq!(bound, expected, "keys: {host_key}, {port_key}, {timeout_key}");
        }
    }

    #[test]
    fn binds_from_env_style_source() {
        let binder = Binder::builder()
            .source(EnvPropertySource::new(
                "env",
                "APP_",
                [
                    ("APP_SERVER_HOST", "localhost"),
                    ("APP_SERVER_PORT", "9090"),
                    ("APP_SERVER_READ_TIMEOUT", "5s"),
                ],
            ))
            .build();
        let bound = binder
            .bind::<ServerConfig>("server")
            .unwrap()
            .get()
            .expect("should bind");
        assert_eq!(bound.port, 9090);
        assert_eq!(bound.read_timeout, Duration::from_secs(5));
    }
}

mod overrides {
    use super::*;

    #[test]
    fn first_source_wins_for_scalars() {
        let binder = Binder::builder()
            .source(map_source("higher", &[("x.y", "1")]))
            .source(map_source("lower", &[("x.y", "2")]))
            .build();
        assert_eq!(binder.bind::<u32>("x.y").unwrap(), BindResult::Bound(1));
    }

    #[test]
    fn env_source_overrides_json_defaults() {
        let binder = Binder::builder()
            .source(EnvPropertySource::new(
                "env",
                "APP_",
                [("APP_SERVER_PORT", "9999")],
            ))
            .source(MapPropertySource::from_json(
                "defaults",
                &json!({"server": {"host": "localhost", "port": 8080}}),
            ))
            .build();
        let bound = binder
            .bind::<ServerConfig>("server")
            .unwrap()
            .get()
            .expect("should bind");
        assert_eq!(bound.host, "localhost");
        assert_eq!(bound.port, 9999);
    }
}

mod sequences {
    use super::*;

    #[test]
    fn merges_indices_across_sources_in_index_order() {
        let binder = Binder::builder()
            .source(map_source("s1", &[("list[1]", "b")]))
            .source(map_source("s2", &[("list[0]", "a")]))
            .build();
        let bound = binder.bind::<Vec<String>>("list").unwrap();
        assert_eq!(
            bound,
            BindResult::Bound(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn conflicting_indices_resolve_to_the_earlier_source() {
        let binder = Binder::builder()
            .source(map_source("s1", &[("list[0]", "first")]))
            .source(map_source("s2", &[("list[0]", "second"), ("list[1]", "extra")]))
            .build();
        let bound = binder.bind::<Vec<String>>("list").unwrap();
        assert_eq!(
            bound,
            BindResult::Bound(vec!["first".to_string(), "extra".to_string()])
        );
    }

    #[test]
    fn sparse_indices_compact_in_order() {
        let binder = binder_over(&[("list[0]", "a"), ("list[2]", "c")]);
        let bound = binder.bind::<Vec<String>>("list").unwrap();
        assert_eq!(
            bound,
            BindResult::Bound(vec!["a".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn comma_separated_values_split_into_elements() {
        let binder = binder_over(&[("ports", "1, 2, 3")]);
        assert_eq!(
            binder.bind::<Vec<u16>>("ports").unwrap(),
            BindResult::Bound(vec![1, 2, 3])
        );
    }

    #[test]
    fn indexed_names_take_precedence_over_a_direct_value() {
        let binder = binder_over(&[("list", "x, y"), ("list[0]", "indexed")]);
        assert_eq!(
            binder.bind::<Vec<String>>("list").unwrap(),
            BindResult::Bound(vec!["indexed".to_string()])
        );
    }

    #[test]
    fn binds_structured_elements() {
        let binder = binder_over(&[
            ("endpoints[0].name", "a"),
            ("endpoints[0].weight", "2"),
            ("endpoints[1].name", "b"),
        ]);
        let bound = binder.bind::<Vec<Endpoint>>("endpoints").unwrap();
        assert_eq!(
            bound,
            BindResult::Bound(vec![
                Endpoint {
                    name: "a".to_string(),
                    weight: 2,
                },
                Endpoint {
                    name: "b".to_string(),
                    weight: 0,
                },
            ])
        );
    }

    #[test]
    fn binds_fixed_size_arrays_and_rejects_length_mismatches() {
        let binder = binder_over(&[("pair", "1,2")]);
        assert_eq!(
            binder.bind::<[u16; 2]>("pair").unwrap(),
            BindResult::Bound([1, 2])
        );
        assert!(matches!(
            binder.bind::<[u16; 3]>("pair"),
            Err(BindError::ConversionFailed { .. })
        ));
    }
}

mod maps {
    use super::*;

    #[test]
    fn discovers_keys_and_binds_values() {
        let binder = binder_over(&[("limits.read", "10"), ("limits.write", "20")]);
        let bound = binder
            .bind::<HashMap<String, u32>>("limits")
            .unwrap()
            .get()
            .expect("should bind");
        assert_eq!(bound["read"], 10);
        assert_eq!(bound["write"], 20);
    }

    #[test]
    fn quoted_keys_keep_their_dots() {
        let binder = binder_over(&[("labels[app.kubernetes.io/name]", "hawser")]);
        let bound = binder
            .bind::<HashMap<String, String>>("labels")
            .unwrap()
            .get()
            .expect("should bind");
        assert_eq!(bound["app.kubernetes.io/name"], "hawser");
    }

    #[test]
    fn unions_keys_across_sources_with_first_wins_on_conflict() {
        let binder = Binder::builder()
            .source(map_source("s1", &[("m.shared", "one")]))
            .source(map_source("s2", &[("m.shared", "two"), ("m.extra", "three")]))
            .build();
        let bound = binder
            .bind::<HashMap<String, String>>("m")
            .unwrap()
            .get()
            .expect("should bind");
        assert_eq!(bound["shared"], "one");
        assert_eq!(bound["extra"], "three");
    }

    #[test]
    fn binds_structured_values() {
        let binder = binder_over(&[
            ("targets.primary.name", "a"),
            ("targets.primary.weight", "7"),
            ("targets.backup.name", "b"),
        ]);
        let bound = binder
            .bind::<HashMap<String, Endpoint>>("targets")
            .unwrap()
            .get()
            .expect("should bind");
        assert_eq!(bound["primary"].weight, 7);
        assert_eq!(bound["backup"].name, "b");
    }
}

mod value_objects {
    use super::*;

    #[test]
    fn missing_required_field_unbinds_the_whole_object() {
        // port is present, host is required but absent.
        let binder = binder_over(&[("server.port", "8080")]);
        assert_eq!(
            binder.bind::<ServerConfig>("server").unwrap(),
            BindResult::Unbound
        );
    }

    #[test]
    fn absent_prefix_is_unbound() {
        let binder = binder_over(&[("elsewhere.value", "1")]);
        assert_eq!(
            binder.bind::<ServerConfig>("server").unwrap(),
            BindResult::Unbound
        );
    }

    #[test]
    fn optional_fields_do_not_block_binding() {
        let binder = binder_over(&[("server.host", "h"), ("server.port", "1")]);
        let bound = binder
            .bind::<ServerConfig>("server")
            .unwrap()
            .get()
            .expect("should bind");
        assert_eq!(bound.max_payload, None);
        assert_eq!(bound.read_timeout, Duration::default());

        let binder = binder_over(&[
            ("server.host", "h"),
            ("server.port", "1"),
            ("server.max-payload", "10MB"),
        ]);
        let bound = binder
            .bind::<ServerConfig>("server")
            .unwrap()
            .get()
            .expect("should bind");
        assert_eq!(bound.max_payload, Some(Byte::from_u64(10_000_000)));
    }

    #[test]
    fn defaulted_structs_allow_partial_binding() {
        let binder = binder_over(&[("retry.enabled", "true")]);
        let bound = binder
            .bind::<RetryConfig>("retry")
            .unwrap()
            .get()
            .expect("should bind");
        assert!(bound.enabled);
        assert_eq!(bound.attempts, 0);
    }

    #[test]
    fn defaulted_structs_bind_onto_a_supplied_instance() {
        let binder = binder_over(&[("retry.enabled", "true")]);
        let existing = RetryConfig {
            enabled: false,
            attempts: 7,
        };
        let bound = binder
            .bind_bindable::<RetryConfig>("retry", Bindable::of(existing))
            .unwrap()
            .get()
            .expect("should bind");
        assert!(bound.enabled);
        assert_eq!(bound.attempts, 7);
    }

    #[test]
    fn renamed_fields_bind_under_the_explicit_name() {
        let binder = binder_over(&[("retry.max-attempts", "5")]);
        let bound = binder
            .bind::<RetryConfig>("retry")
            .unwrap()
            .get()
            .expect("should bind");
        assert_eq!(bound.attempts, 5);
    }

    #[test]
    fn nested_and_shared_composites_bind_recursively() {
        #[derive(Debug, Bind)]
        struct AppConfig {
            server: ServerConfig,
            #[bind(default)]
            retry: RetryConfig,
            #[bind(default)]
            fallback: Option<Arc<Endpoint>>,
        }

        let binder = Binder::builder()
            .source(MapPropertySource::from_json(
                "json",
                &json!({
                    "app": {
                        "server": {"host": "h", "port": 1},
                        "retry": {"enabled": true, "max-attempts": 3},
                        "fallback": {"name": "spare"}
                    }
                }),
            ))
            .build();
        let bound = binder
            .bind::<AppConfig>("app")
            .unwrap()
            .get()
            .expect("should bind");
        assert_eq!(bound.server.port, 1);
        assert_eq!(bound.retry.attempts, 3);
        assert_eq!(bound.fallback.as_ref().unwrap().name, "spare");
    }
}

mod placeholders {
    use super::*;

    #[test]
    fn placeholders_resolve_across_sources() {
        let binder = binder_over(&[("name", "${greeting} world"), ("greeting", "hello")]);
        assert_eq!(
            binder.bind::<String>("name").unwrap(),
            BindResult::Bound("hello world".to_string())
        );
    }

    #[test]
    fn self_referential_placeholder_is_circular() {
        let binder = binder_over(&[("x", "${x}")]);
        assert!(matches!(
            binder.bind::<String>("x"),
            Err(BindError::CircularPlaceholder { .. })
        ));
    }

    #[test]
    fn missing_placeholder_fails_strict_and_passes_lenient() {
        let strict = binder_over(&[("greeting", "${nobody}")]);
        assert!(matches!(
            strict.bind::<String>("greeting"),
            Err(BindError::PlaceholderNotFound { .. })
        ));

        let lenient = Binder::builder()
            .source(map_source("test", &[("greeting", "${nobody}")]))
            .placeholder_mode(PlaceholderMode::Lenient)
            .build();
        assert_eq!(
            lenient.bind::<String>("greeting").unwrap(),
            BindResult::Bound("${nobody}".to_string())
        );
    }

    #[test]
    fn placeholders_resolve_before_conversion() {
        let binder = binder_over(&[("port", "${default-port:8080}")]);
        assert_eq!(binder.bind::<u16>("port").unwrap(), BindResult::Bound(8080));
    }
}

mod failures {
    use super::*;

    #[test]
    fn conversion_failure_names_the_property_and_origin() {
        let binder = binder_over(&[("server.host", "h"), ("server.port", "notanumber")]);
        let error = binder.bind::<ServerConfig>("server").unwrap_err();
        match error {
            BindError::ConversionFailed {
                name,
                value,
                origin,
                ..
            } => {
                assert_eq!(name, "server.port");
                assert_eq!(value, "notanumber");
                assert!(origin.unwrap().source().contains("test"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn overflow_is_a_conversion_failure() {
        let binder = binder_over(&[("server.host", "h"), ("server.port", "70000")]);
        assert!(matches!(
            binder.bind::<ServerConfig>("server"),
            Err(BindError::ConversionFailed { .. })
        ));
    }

    #[test]
    fn malformed_prefix_is_an_invalid_name() {
        let binder = binder_over(&[]);
        assert!(matches!(
            binder.bind::<u32>("bad..prefix"),
            Err(BindError::InvalidName { .. })
        ));
    }

    #[test]
    fn ignore_errors_handler_skips_invalid_fields() {
        let binder = binder_over(&[("retry.enabled", "true"), ("retry.max-attempts", "lots")]);
        assert!(binder.bind::<RetryConfig>("retry").is_err());

        let mut ignore = IgnoreErrorsHandler;
        let bound = binder
            .bind_with_handler::<RetryConfig>("retry", Bindable::new(), &mut ignore)
            .unwrap()
            .get()
            .expect("should bind");
        assert!(bound.enabled);
        assert_eq!(bound.attempts, 0);
    }
}

mod unbound_elements {
    use super::*;

    #[test]
    fn leftover_names_are_aggregated_into_one_error() {
        let binder = binder_over(&[
            ("retry.enabled", "true"),
            ("retry.max-attempts", "3"),
            ("retry.typo-one", "x"),
            ("retry.typo-two", "y"),
        ]);
        let mut strict = NoUnboundElementsHandler;
        let error = binder
            .bind_with_handler::<RetryConfig>("retry", Bindable::new(), &mut strict)
            .unwrap_err();
        match error {
            BindError::UnboundElements { names } => {
                assert_eq!(names, vec!["retry.typo-one", "retry.typo-two"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unrelated_prefixes_never_trip_the_check() {
        let binder = binder_over(&[("retry.enabled", "true"), ("other.key", "x")]);
        let mut strict = NoUnboundElementsHandler;
        let bound = binder
            .bind_with_handler::<RetryConfig>("retry", Bindable::new(), &mut strict)
            .unwrap();
        assert!(bound.is_bound());
    }

    #[test]
    fn consumed_relaxed_variants_are_not_leftovers() {
        let binder = binder_over(&[("retry.ENABLED", "true"), ("retry.maxAttempts", "3")]);
        let mut strict = NoUnboundElementsHandler;
        let bound = binder
            .bind_with_handler::<RetryConfig>("retry", Bindable::new(), &mut strict)
            .unwrap();
        assert!(bound.is_bound());
    }
}

mod tracking {
    use super::*;

    #[test]
    fn bound_properties_record_their_origins() {
        let binder = Binder::builder()
            .source(map_source("overrides", &[("server.port", "9")]))
            .source(map_source(
                "defaults",
                &[("server.host", "h"), ("server.port", "1")],
            ))
            .build();
        let mut tracker = BoundPropertiesHandler::new();
        let mut pipeline = HandlerPipeline::new().with(&mut tracker);
        binder
            .bind_with_handler::<ServerConfig>("server", Bindable::new(), &mut pipeline)
            .unwrap()
            .get()
            .expect("should bind");

        let port = PropertyName::parse("server.port").unwrap();
        let host = PropertyName::parse("server.host").unwrap();
        assert_eq!(tracker.origin_of(&port).unwrap().source(), "overrides");
        assert_eq!(tracker.origin_of(&host).unwrap().source(), "defaults");
    }
}

mod enums_and_units {
    use super::*;

    #[test]
    fn relaxed_enum_constants_bind() {
        for raw in ["round-robin", "ROUND_ROBIN", "roundRobin"] {
            let binder = binder_over(&[("strategy", raw)]);
            assert_eq!(
                binder.bind::<Strategy>("strategy").unwrap(),
                BindResult::Bound(Strategy::RoundRobin),
                "{raw}"
            );
        }
    }

    #[test]
    fn unknown_enum_constant_is_a_conversion_failure() {
        let binder = binder_over(&[("strategy", "weighted")]);
        assert!(matches!(
            binder.bind::<Strategy>("strategy"),
            Err(BindError::ConversionFailed { .. })
        ));
    }

    #[test]
    fn durations_and_byte_sizes_convert_with_units() {
        let binder = binder_over(&[("timeout", "1h 30m"), ("size", "512KiB")]);
        assert_eq!(
            binder.bind::<Duration>("timeout").unwrap(),
            BindResult::Bound(Duration::from_secs(5400))
        );
        assert_eq!(
            binder.bind::<Byte>("size").unwrap(),
            BindResult::Bound(Byte::from_u64(512 * 1024))
        );
    }
}

mod absence {
    use super::*;

    #[test]
    fn unbound_is_distinguishable_from_bound_to_empty() {
        let binder = binder_over(&[("present-but-empty", "")]);
        assert_eq!(
            binder.bind::<Vec<String>>("absent").unwrap(),
            BindResult::Unbound
        );
        assert_eq!(
            binder.bind::<Vec<String>>("present-but-empty").unwrap(),
            BindResult::Bound(Vec::new())
        );
    }

    #[test]
    fn empty_json_collections_bind_empty() {
        let binder = Binder::builder()
            .source(MapPropertySource::from_json("json", &json!({"list": []})))
            .build();
        assert_eq!(
            binder.bind::<Vec<String>>("list").unwrap(),
            BindResult::Bound(Vec::new())
        );
    }

    #[test]
    fn bind_or_default_covers_absent_prefixes() {
        let binder = binder_over(&[]);
        let bound = binder.bind_or_default::<RetryConfig>("retry").unwrap();
        assert_eq!(bound, RetryConfig::default());
    }
}

mod idempotence {
    use super::*;

    #[test]
    fn repeated_binds_yield_equal_results() {
        let binder = binder_over(&[
            ("server.host", "h"),
            ("server.port", "1"),
            ("server.read-timeout", "2s"),
        ]);
        let first = binder.bind::<ServerConfig>("server").unwrap();
        let second = binder.bind::<ServerConfig>("server").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn binder_is_shareable_across_threads() {
        let binder = Arc::new(binder_over(&[("value", "42")]));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let binder = Arc::clone(&binder);
                std::thread::spawn(move || binder.bind::<u32>("value").unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), BindResult::Bound(42));
        }
    }
}

mod validation {
    use super::*;

    impl Validatable for ServerConfig {
        fn validate(&self, violations: &mut Violations) {
            if self.port == 0 {
                violations.add("server.port", "must not be zero");
            }
            if self.host.is_empty() {
                violations.add("server.host", "must not be empty");
            }
        }
    }

    #[test]
    fn all_violations_are_aggregated() {
        let binder = binder_over(&[("server.host", ""), ("server.port", "0")]);
        let error = binder.bind_validated::<ServerConfig>("server").unwrap_err();
        match error {
            BindError::Validation(validation) => {
                assert_eq!(validation.violations().len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn valid_configs_pass_through() {
        let binder = binder_over(&[("server.host", "h"), ("server.port", "1")]);
        assert!(binder.bind_validated::<ServerConfig>("server").is_ok());
    }

    #[test]
    fn external_validators_run_over_the_bound_value() {
        let binder = binder_over(&[("retry.enabled", "true"), ("retry.max-attempts", "99")]);
        let bounded = |config: &RetryConfig, violations: &mut Violations| {
            if config.attempts > 10 {
                violations.add("retry.max-attempts", "must be at most 10");
            }
        };
        let error = binder
            .bind_validated_with::<RetryConfig>("retry", &[&bounded])
            .unwrap_err();
        assert!(matches!(error, BindError::Validation(_)));
    }
}

mod custom_sources {
    use super::*;
    use hawser::{Origin, Property, PropertyValue};

    /// A source computing values on demand, exercising the trait surface a
    /// caller-supplied implementation sees.
    struct SingleValueSource {
        at: PropertyName,
        value: String,
    }

    impl PropertySource for SingleValueSource {
        fn source_name(&self) -> &str {
            "single"
        }

        fn get(&self, name: &PropertyName) -> Option<Property> {
            (*name == self.at).then(|| {
                Property::new(
                    name.clone(),
                    PropertyValue::Str(self.value.clone()),
                    Origin::new("single"),
                )
            })
        }

        fn descendants(&self, prefix: &PropertyName) -> Vec<PropertyName> {
            prefix
                .is_ancestor_of(&self.at)
                .then(|| self.at.clone())
                .into_iter()
                .collect()
        }
    }

    #[test]
    fn custom_sources_participate_like_built_ins() {
        let binder = Binder::builder()
            .source(SingleValueSource {
                at: PropertyName::parse("custom.answer").unwrap(),
                value: "42".to_string(),
            })
            .build();
        assert_eq!(
            binder.bind::<u32>("custom.answer").unwrap(),
            BindResult::Bound(42)
        );
    }
}
