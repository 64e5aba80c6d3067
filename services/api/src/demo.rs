use crate::infra::{load_positions, InMemoryReviewNotifier, InMemoryValidationRepository};
use chrono::Local;
use clap::Args;
use puesto_ai::config::AppConfig;
use puesto_ai::error::AppError;
use puesto_ai::telemetry;
use puesto_ai::workflows::normative::{NormativeFragment, NormativeIndexCache};
use puesto_ai::workflows::positions::{
    get_acceptable_impact_ranges, get_expected_impact_profile, Alignment, BatchReport,
    ComplexityLevel, DecisionScope, ErrorConsequences, EvaluationConfig, FunctionId,
    FunctionJudgment, LevelLetter, LevelProfileResolver, PositionId, PositionInput,
    PositionValidationService, ValidationEngine, ValidationOutcome,
};
use puesto_ai::workflows::positions::report::views::BatchReportSummary;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Position file: `.csv` export or JSON (single position, array, or `{"positions": [...]}`)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Emit the full outcomes and summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Include per-function findings in the text report
    #[arg(long)]
    pub(crate) findings: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct LevelsArgs {
    /// Show a single salary-level code instead of every tier
    #[arg(long)]
    pub(crate) code: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Include per-function findings in the report
    #[arg(long)]
    pub(crate) findings: bool,
    /// Skip the regulation keyword search step
    #[arg(long)]
    pub(crate) skip_backing_search: bool,
}

#[derive(Serialize)]
struct ValidationReportJson<'a> {
    outcomes: &'a [ValidationOutcome],
    summary: BatchReportSummary,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let positions = load_positions(&args.input)?;
    let service = PositionValidationService::new(
        Arc::new(InMemoryValidationRepository::default()),
        Arc::new(InMemoryReviewNotifier::default()),
        config.evaluation,
    );
    let outcomes = service.validate_batch(&positions)?;
    let report = BatchReport::from_outcomes(outcomes);

    if args.json {
        let payload = ValidationReportJson {
            outcomes: &report.outcomes,
            summary: report.summary(),
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", report.render_text(args.findings));
    }

    Ok(())
}

pub(crate) fn run_levels(args: LevelsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let resolver = LevelProfileResolver::new(config.evaluation.thresholds);

    let codes: Vec<String> = match args.code {
        Some(code) => vec![code],
        None => LevelLetter::ordered()
            .into_iter()
            .map(|letter| letter.as_char().to_string())
            .collect(),
    };

    for code in codes {
        let context = resolver.resolve(&code);
        let profile = get_expected_impact_profile(&code);
        let ranges = get_acceptable_impact_ranges(&code);

        println!(
            "{} ({}) umbral crítico {:.0}%",
            context.letter.as_char(),
            context.letter.label(),
            context.threshold * 100.0
        );
        println!(
            "  perfil esperado: alcance {} | consecuencias {} | complejidad {}",
            profile.decision_scope, profile.error_consequences, profile.complexity_level
        );
        println!("  alcance aceptable: {}", join_labels(&ranges.decision_scope));
        println!(
            "  consecuencias aceptables: {}",
            join_labels(&ranges.error_consequences)
        );
        println!(
            "  complejidad aceptable: {}",
            join_labels(&ranges.complexity_level)
        );
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        findings,
        skip_backing_search,
    } = args;

    let config = EvaluationConfig::default();
    let mut engine = ValidationEngine::new(config);
    if !skip_backing_search {
        let cache = NormativeIndexCache::new();
        let index = cache.get_or_build(&demo_regulation());
        engine = engine.with_backing_search(index);
    }

    let repository = Arc::new(InMemoryValidationRepository::default());
    let notifier = Arc::new(InMemoryReviewNotifier::default());
    let service =
        PositionValidationService::with_engine(Arc::new(engine), repository, notifier.clone());

    println!(
        "Demostración de validación de puestos ({})",
        Local::now().format("%Y-%m-%d %H:%M")
    );

    let outcomes = service.validate_batch(&demo_positions())?;
    let report = BatchReport::from_outcomes(outcomes);
    print!("{}", report.render_text(findings));

    let backed: Vec<_> = report
        .outcomes
        .iter()
        .flat_map(|outcome| {
            outcome
                .backing
                .iter()
                .map(move |hit| (outcome.position_id.0.as_str(), hit))
        })
        .collect();
    if !backed.is_empty() {
        println!("\nRespaldo normativo encontrado");
        for (position, hit) in backed {
            println!(
                "- {} {}: {} ({}, similitud {:.2})",
                position,
                hit.function_id.0,
                hit.normative.fragment_id,
                hit.normative.source,
                hit.normative.score
            );
        }
    }

    let requests = notifier.requests();
    if requests.is_empty() {
        println!("\nRevisiones manuales: ninguna");
    } else {
        println!("\nRevisiones manuales");
        for request in requests {
            let failed: Vec<_> = request
                .failed_criteria
                .iter()
                .map(|criterion| criterion.label())
                .collect();
            println!(
                "- {} [{}] {}: {}",
                request.position_id.0,
                request.level_code,
                request.accion_requerida,
                failed.join(", ")
            );
        }
    }

    Ok(())
}

fn join_labels<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn demo_regulation() -> Vec<NormativeFragment> {
    [
        (
            "RI-ART-9",
            "Reglamento Interior, artículo 9",
            "Corresponde a las direcciones de área supervisar la integración de los informes de gestión y coordinar su entrega a la unidad responsable",
        ),
        (
            "MO-DGRH-4",
            "Manual de Organización, función 4",
            "Autorizar los movimientos de personal de la unidad administrativa conforme a las disposiciones aplicables",
        ),
        (
            "LOAPF-37",
            "Ley Orgánica de la Administración Pública Federal, artículo 37",
            "Definir y conducir la política nacional en materia de control interno y evaluación de la gestión gubernamental",
        ),
    ]
    .into_iter()
    .map(|(id, source, text)| NormativeFragment {
        id: id.to_string(),
        source: source.to_string(),
        text: text.to_string(),
    })
    .collect()
}

fn demo_function(
    id: &str,
    verb: &str,
    description: &str,
    impact: (DecisionScope, ErrorConsequences, ComplexityLevel),
    verb_appropriate: bool,
    alignment: Alignment,
) -> FunctionJudgment {
    FunctionJudgment {
        id: FunctionId(id.to_string()),
        description: description.to_string(),
        verb: verb.to_string(),
        detected_scope: impact.0,
        detected_consequences: impact.1,
        detected_complexity: impact.2,
        verb_appropriate,
        verb_forbidden: false,
        has_external_backing: false,
        alignment,
    }
}

fn demo_positions() -> Vec<PositionInput> {
    use ComplexityLevel as C;
    use DecisionScope as S;
    use ErrorConsequences as E;

    vec![
        PositionInput {
            position_id: PositionId("SFP-G11-001".to_string()),
            level_code: "G11".to_string(),
            functions: vec![
                demo_function(
                    "F1",
                    "Definir",
                    "Definir y conducir la política nacional de control interno",
                    (S::StrategicNational, E::Systemic, C::Innovative),
                    true,
                    Alignment::Aligned,
                ),
                demo_function(
                    "F2",
                    "Establecer",
                    "Establecer lineamientos de evaluación de la gestión gubernamental",
                    (S::StrategicNational, E::Strategic, C::Transformational),
                    true,
                    Alignment::Partial,
                ),
                demo_function(
                    "F3",
                    "Archivar",
                    "Archivar la correspondencia recibida",
                    (S::Local, E::Operational, C::Routine),
                    false,
                    Alignment::NotAligned,
                ),
            ],
        },
        PositionInput {
            position_id: PositionId("DGRH-M33-014".to_string()),
            level_code: "M33".to_string(),
            functions: vec![
                demo_function(
                    "F1",
                    "Supervisar",
                    "Supervisar la integración de los informes de gestión de la unidad",
                    (S::Institutional, E::Tactical, C::Analytical),
                    true,
                    Alignment::NotAligned,
                ),
                demo_function(
                    "F2",
                    "Autorizar",
                    "Autorizar los movimientos de personal de la unidad administrativa",
                    (S::Institutional, E::Strategic, C::Strategic),
                    false,
                    Alignment::NotAligned,
                ),
                demo_function(
                    "F3",
                    "Aprobar",
                    "Aprobar el programa sectorial de mediano plazo",
                    (S::StrategicNational, E::Systemic, C::Innovative),
                    false,
                    Alignment::Unassessed,
                ),
            ],
        },
        PositionInput {
            position_id: PositionId("OM-P11-203".to_string()),
            level_code: "P11".to_string(),
            functions: vec![
                demo_function(
                    "F1",
                    "Registrar",
                    "Registrar las solicitudes de servicio en el sistema",
                    (S::Local, E::Operational, C::Routine),
                    true,
                    Alignment::Aligned,
                ),
                demo_function(
                    "F2",
                    "Dirigir",
                    "Dirigir la estrategia institucional de contrataciones",
                    (S::Institutional, E::Strategic, C::Strategic),
                    false,
                    Alignment::NotAligned,
                ),
                demo_function(
                    "F3",
                    "Determinar",
                    "Determinar los programas interinstitucionales de inversión",
                    (S::Interinstitutional, E::Systemic, C::Innovative),
                    false,
                    Alignment::NotAligned,
                ),
            ],
        },
    ]
}
