//! TypeScript views of the IR
//!
//! Everything the templates print is computed here: type expressions, class
//! and file names, imports and call expressions. Templates only lay it out.

use restgen_common::naming::{camel_case, dash_case, pascal_case, safe_field_name};
use restgen_common::{
    CallTemplate, CanonicalAction, Definition, FieldSpec, Method, Registry, Service, SubField,
    TemplateSegment,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Fallback service name for the root path
const ROOT_SERVICE_NAME: &str = "api";

/// Canonical actions in the order methods are written to a service file
pub const METHOD_ORDER: [CanonicalAction; 5] = [
    CanonicalAction::Create,
    CanonicalAction::Get,
    CanonicalAction::GetById,
    CanonicalAction::Update,
    CanonicalAction::Remove,
];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ImportView {
    pub symbol: String,
    /// Module path relative to the importing file, without extension
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub name: String,
    pub ts_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumView {
    /// TypeScript enum name, e.g. `StatusEnum`
    pub name: String,
    /// File stem, e.g. `status`
    pub file_stem: String,
    /// Members rendered as `TOKEN = value`
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelView {
    pub type_name: String,
    pub tag: String,
    pub fields: Vec<FieldView>,
    pub imports: Vec<ImportView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterView {
    pub class_name: String,
    pub file_stem: String,
    pub fields: Vec<FieldView>,
    pub imports: Vec<ImportView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamView {
    pub name: String,
    pub ts_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodView {
    /// Canonical action, used as the method name
    pub name: String,
    /// HttpClient method
    pub verb: String,
    pub params: Vec<ParamView>,
    pub response_type: String,
    /// Interpolated URL expression
    pub call: String,
    /// Second HttpClient argument: `body` or `filter`
    pub payload: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceView {
    /// Last literal path segment, e.g. `phonenumbers`
    pub name: String,
    pub file_name: String,
    /// Output directory relative to the destination root
    #[serde(skip)]
    pub directory: PathBuf,
    pub methods: Vec<MethodView>,
    pub imports: Vec<ImportView>,
}

/// Everything written for one service directory
#[derive(Debug, Clone)]
pub struct ServiceFiles {
    pub service: ServiceView,
    pub filters: Vec<FilterView>,
    pub models: Vec<ModelView>,
    pub enums: Vec<EnumView>,
}

/// A filter model and what its fields refer to
struct FilterFiles<'a> {
    view: FilterView,
    models: Vec<&'a Definition>,
    enums: BTreeMap<String, EnumView>,
}

/// Records the models and enums a file refers to while its types are rendered
struct TypeCollector<'a> {
    registry: &'a Registry,
    models: BTreeMap<String, &'a Definition>,
    enums: BTreeMap<String, EnumView>,
}

impl<'a> TypeCollector<'a> {
    fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            models: BTreeMap::new(),
            enums: BTreeMap::new(),
        }
    }

    /// TypeScript type of a field, parameter or response named `name`
    fn ts_type(&mut self, name: &str, spec: &FieldSpec) -> String {
        match spec {
            FieldSpec::Boolean => "boolean".to_string(),
            FieldSpec::Number => "number".to_string(),
            FieldSpec::String => "string".to_string(),
            FieldSpec::Enum { .. } => self.enum_type(name, spec),
            FieldSpec::Array { element, values } if values.is_empty() => {
                format!("{}[]", self.sub_type(element))
            }
            FieldSpec::Array { .. } => format!("{}[]", self.enum_type(name, spec)),
            FieldSpec::Object {
                element: Some(element @ SubField::Reference { .. }),
            } => self.sub_type(element),
            FieldSpec::Object { .. } | FieldSpec::Any { .. } => "any".to_string(),
        }
    }

    fn sub_type(&mut self, sub_field: &SubField) -> String {
        match sub_field {
            SubField::Boolean => "boolean".to_string(),
            SubField::Number => "number".to_string(),
            SubField::String => "string".to_string(),
            SubField::Reference { target } => {
                match self.registry.resolve_definition_ref(target).ok() {
                    Some(definition) => {
                        self.models
                            .insert(definition.source_name.clone(), definition);
                        model_class(definition)
                    }
                    None => "any".to_string(),
                }
            }
            SubField::Any { .. } => "any".to_string(),
        }
    }

    fn enum_type(&mut self, name: &str, spec: &FieldSpec) -> String {
        let view = EnumView {
            name: format!("{}Enum", pascal_case(name)),
            file_stem: dash_case(name),
            members: spec
                .enum_values()
                .unwrap_or_default()
                .iter()
                .map(ToString::to_string)
                .collect(),
        };
        let enum_name = view.name.clone();
        self.enums.insert(view.file_stem.clone(), view);
        enum_name
    }

    /// Imports for everything recorded so far
    fn imports(&self) -> Vec<ImportView> {
        let models = self.models.values().map(|definition| ImportView {
            symbol: model_class(definition),
            path: format!("./{}.model", definition.tag),
        });
        let enums = self.enums.values().map(|view| ImportView {
            symbol: view.name.clone(),
            path: format!("./{}.enum", view.file_stem),
        });
        let unique: BTreeSet<ImportView> = models.chain(enums).collect();
        unique.into_iter().collect()
    }
}

fn model_class(definition: &Definition) -> String {
    format!("{}Model", definition.type_name)
}

/// Literal segments of a canonical path, tokens removed
pub fn literal_segments(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|segment| !segment.is_empty() && !segment.starts_with('{'))
        .collect()
}

/// URL expression for a call template, with the id appended for item actions
///
/// # Examples
/// ```
/// use restgen_common::CallTemplate;
/// use restgen_generator::typescript::call_expression;
///
/// let template = CallTemplate::from_path("/users/{userId}/phones");
/// assert_eq!(
///     call_expression(&template, Some("phoneId")),
///     "'/users/' + userId + '/phones/' + phoneId"
/// );
/// ```
pub fn call_expression(template: &CallTemplate, id: Option<&str>) -> String {
    let mut segments = template.segments.clone();
    if let Some(id) = id {
        match segments.pop() {
            Some(TemplateSegment::Literal(mut text)) => {
                if !text.ends_with('/') {
                    text.push('/');
                }
                segments.push(TemplateSegment::Literal(text));
            }
            Some(parameter) => {
                segments.push(parameter);
                segments.push(TemplateSegment::Literal("/".to_string()));
            }
            None => segments.push(TemplateSegment::Literal("/".to_string())),
        }
        segments.push(TemplateSegment::Parameter(camel_case(id)));
    }
    CallTemplate { segments }.render(|text| format!("'{}'", text), str::to_string, " + ")
}

/// Build the views for one service and everything it refers to
pub fn service_files(service: &Service, registry: &Registry) -> ServiceFiles {
    let literals = literal_segments(&service.path);
    let name = literals.last().copied().unwrap_or(ROOT_SERVICE_NAME).to_string();
    let directory: PathBuf = literals.iter().collect();

    let mut collector = TypeCollector::new(registry);
    let mut filters = Vec::new();
    let mut methods = Vec::new();

    for action in METHOD_ORDER {
        let Some(method) = service.method(action) else {
            continue;
        };
        let view = method_view(service, method, &name, registry, &mut collector, &mut filters);
        methods.push(view);
    }

    // Walk model references until every reachable definition is collected
    let mut pending: Vec<&Definition> = collector.models.values().copied().collect();
    let mut enums: BTreeMap<String, EnumView> = collector.enums.clone();
    let mut filter_views = Vec::new();
    for filter in filters {
        pending.extend(filter.models);
        enums.extend(filter.enums);
        filter_views.push(filter.view);
    }
    let filters = filter_views;

    let mut seen = BTreeSet::new();
    let mut models = Vec::new();
    while let Some(definition) = pending.pop() {
        if !seen.insert(definition.source_name.clone()) {
            continue;
        }
        let (view, referenced, model_enums) = model_view(definition, registry);
        pending.extend(referenced);
        enums.extend(model_enums);
        models.push(view);
    }
    models.sort_by(|a, b| a.tag.cmp(&b.tag));

    let mut imports = collector.imports();
    imports.extend(filters.iter().map(|filter| ImportView {
        symbol: filter.class_name.clone(),
        path: format!("./{}", filter.file_stem),
    }));
    imports.sort();
    imports.dedup();

    ServiceFiles {
        service: ServiceView {
            file_name: format!("{}.service.ts", dash_case(&name)),
            name,
            directory,
            methods,
            imports,
        },
        filters,
        models,
        enums: enums.into_values().collect(),
    }
}

fn method_view<'a>(
    service: &Service,
    method: &Method,
    service_name: &str,
    registry: &'a Registry,
    collector: &mut TypeCollector<'a>,
    filters: &mut Vec<FilterFiles<'a>>,
) -> MethodView {
    let mut params: Vec<ParamView> = service
        .path_parameters
        .iter()
        .map(|parameter| {
            let name = parameter.resolved_name(registry).to_string();
            ParamView {
                ts_type: collector.ts_type(&name, &parameter.resolved_spec(registry)),
                name,
            }
        })
        .collect();

    let id = match (&service.id_parameter, method.action.is_id_action()) {
        (Some(parameter), true) => {
            let name = parameter.resolved_name(registry).to_string();
            params.push(ParamView {
                ts_type: collector.ts_type(&name, &parameter.resolved_spec(registry)),
                name: name.clone(),
            });
            Some(name)
        }
        _ => None,
    };

    let mut payload = None;
    if let Some(body) = method.body_parameter(registry) {
        params.push(ParamView {
            name: "body".to_string(),
            ts_type: collector.ts_type("body", &body.resolved_spec(registry)),
        });
        payload = Some("body".to_string());
    } else {
        let query = method.query_parameters(registry);
        if !query.is_empty() {
            let mut filter_collector = TypeCollector::new(registry);
            let fields = query
                .iter()
                .map(|parameter| {
                    let name = parameter.resolved_name(registry);
                    FieldView {
                        name: safe_field_name(name),
                        ts_type: filter_collector.ts_type(name, &parameter.resolved_spec(registry)),
                    }
                })
                .collect();
            let view = FilterView {
                class_name: format!(
                    "{}{}FilterModel",
                    pascal_case(service_name),
                    pascal_case(method.action.as_str())
                ),
                file_stem: format!(
                    "{}-{}-filter.model",
                    dash_case(service_name),
                    dash_case(method.action.as_str())
                ),
                fields,
                imports: filter_collector.imports(),
            };
            params.push(ParamView {
                name: "filter".to_string(),
                ts_type: view.class_name.clone(),
            });
            payload = Some("filter".to_string());
            filters.push(FilterFiles {
                view,
                models: filter_collector.models.into_values().collect(),
                enums: filter_collector.enums,
            });
        }
    }

    let response_type = method
        .response
        .as_ref()
        .and_then(|response| response.body.as_ref())
        .map(|body| collector.ts_type("response", body))
        .unwrap_or_else(|| "void".to_string());

    MethodView {
        name: method.action.as_str().to_string(),
        verb: method.verb.as_str().to_string(),
        params,
        response_type,
        call: call_expression(&service.call_template, id.as_deref()),
        payload,
    }
}

/// Model view plus the definitions and enums its fields refer to
fn model_view<'a>(
    definition: &'a Definition,
    registry: &'a Registry,
) -> (ModelView, Vec<&'a Definition>, BTreeMap<String, EnumView>) {
    let mut collector = TypeCollector::new(registry);
    let fields = definition
        .fields
        .iter()
        .map(|(name, spec)| FieldView {
            name: safe_field_name(name),
            ts_type: collector.ts_type(name, spec),
        })
        .collect();

    // a self reference needs no import
    collector.models.remove(&definition.source_name);
    let view = ModelView {
        type_name: definition.type_name.clone(),
        tag: definition.tag.clone(),
        fields,
        imports: collector.imports(),
    };
    let referenced = collector.models.values().copied().collect();
    (view, referenced, collector.enums)
}
