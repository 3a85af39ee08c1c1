//! Python sources run by the bridge.
//!
//! Every script reads one JSON object on stdin and prints one JSON object on
//! stdout. Failures are reported as `{"error": kind, "message": text}` with
//! `kind` either `unsupported_model` or `failed`.

/// Shared helpers prepended to every script.
const PRELUDE: &str = r#"
import json
import pickle
import sys

def emit(obj):
    sys.stdout.write(json.dumps(obj))
    sys.stdout.flush()

def fail(kind, err):
    emit({"error": kind, "message": str(err)})
    sys.exit(0)

def scalar(x):
    return x.item() if hasattr(x, "item") else x

def load_model(path):
    try:
        import joblib
        return joblib.load(path)
    except ImportError:
        with open(path, "rb") as fh:
            return pickle.load(fh)

def frame(obj):
    import pandas as pd
    return pd.DataFrame(obj["rows"], columns=obj["columns"])

payload = json.load(sys.stdin)
try:
    model = load_model(payload["model_path"])
except Exception as err:
    fail("failed", err)
"#;

const DESCRIBE_BODY: &str = r#"
try:
    from sklearn.base import is_classifier
    from sklearn.utils.validation import check_is_fitted
    try:
        check_is_fitted(model)
        fitted = True
    except Exception:
        fitted = False
    classes = getattr(model, "classes_", None) if fitted else None
    emit({
        "family": type(model).__name__,
        "fitted": fitted,
        "classifier": bool(is_classifier(model)),
        "classes": [scalar(c) for c in classes] if classes is not None else None,
    })
except Exception as err:
    fail("failed", err)
"#;

const PREDICT_BODY: &str = r#"
try:
    pred = model.predict(frame(payload["instance"]))[0]
    emit({"prediction": scalar(pred)})
except Exception as err:
    fail("failed", err)
"#;

const SHAP_BODY: &str = r#"
import numpy as np
import shap

background = payload.get("background")
try:
    explainer = shap.TreeExplainer(
        model,
        model_output="raw",
        data=frame(background) if background else None,
    )
except Exception as err:
    fail("unsupported_model", err)

try:
    raw = explainer.shap_values(frame(payload["instance"]))
    values = np.stack(raw, axis=-1) if isinstance(raw, list) else np.asarray(raw)
    if values.ndim == 3:
        tensor = {"shape": "per_class", "values": values[0].tolist()}
    else:
        tensor = {"shape": "single", "values": values[0].tolist()}
    expected = explainer.expected_value
    if np.ndim(expected) == 0:
        expected = float(expected)
    else:
        expected = [float(v) for v in np.ravel(expected)]
    emit({"values": tensor, "expected_value": expected})
except Exception as err:
    fail("failed", err)
"#;

const PYXAI_BODY: &str = r#"
import numpy as np

try:
    from pyxai import Explainer, Learning
    learner, imported = Learning.import_models(model, payload["feature_names"])
except Exception as err:
    fail("unsupported_model", err)

try:
    explainer = Explainer.initialize(imported, instance=np.asarray(payload["instance_values"]))
    reason = explainer.sufficient_reason()
    emit({"literals": [str(f) for f in explainer.to_features(reason)]})
except Exception as err:
    fail("failed", err)
"#;

fn with_prelude(body: &str) -> String {
    format!("{PRELUDE}{body}")
}

/// Reports family, fitted state and class labels of a persisted model.
pub fn describe() -> String {
    with_prelude(DESCRIBE_BODY)
}

/// Predicts the single row of `instance`.
pub fn predict() -> String {
    with_prelude(PREDICT_BODY)
}

/// Tree SHAP values and expected value for one instance.
pub fn shap_values() -> String {
    with_prelude(SHAP_BODY)
}

/// Minimal sufficient reason as feature literals.
pub fn sufficient_reason() -> String {
    with_prelude(PYXAI_BODY)
}
