//! Page Content
//!
//! The fragments placed in the content area for each view.

use crate::analytics::Analytics;

use super::html::{html_escape, script_json};

const ABOUT_TITLE: &str = "Acerca del proyecto";

const ABOUT_PARAGRAPHS: [&str; 4] = [
    "Existen dos procesos biológicos íntimamente relacionados de un individuo los cuales no necesariamente van paralelos a lo largo de la infancia y adolescencia, estos dos procesos son el crecimiento y la maduración. Cada niño madura a distinta velocidad, es decir que la edad no es un buen indicativo para ello (Pérez, 2011).",
    "La edad ósea (EO) es la mejor forma de expresar la edad biológica de una persona, y es de suma importancia en el campo de la medicina dado que muchos tratamientos y procedimientos deben ser cuidadosamente basados en la edad del individuo. Esto también permite evaluar la maduración ósea que, según medios, es \"es un fenómeno biológico a través del cual los seres vivos incrementan su masa adquiriendo progresivamente una maduración morfológica y funcional\" (Europapress, 2015).",
    "El principal problema se centra en que, a pesar de tener una radiografía presente y clara, no existe un proceso 100% automatizado que identifique la edad ósea de una persona. El procedimiento se centra siempre en el criterio de un experto y dado que es una tarea manual, existirá variabilidad interindividual. Esto abre lugar a resultados raramente precisos y expuestos a un porcentaje de error humano (Abad. D, 2011).",
    "Las computadoras y el uso de algoritmos complejos, junto con las aplicaciones de inteligencia artificial (como lo es machine learning y deep learning), han presentado resultados prontos y exactos. Esto da lugar a un aumento de eficiencia y confiabilidad en los resultados, por lo que obtener un modelo capaz de predecir la edad ósea de un individuo es sumamente conveniente.",
];

/// Project information page
pub fn home_page() -> String {
    let paragraphs: String = ABOUT_PARAGRAPHS
        .iter()
        .map(|p| format!("<p>{}</p>\n", html_escape(p)))
        .collect();

    format!(
        r#"<div>
    <div style="text-align: justify; padding: 25px 50px 25px;"><h1>{title}</h1></div>
    <div style="text-align: justify; padding: 25px 50px 75px;">
{paragraphs}    </div>
</div>"#,
        title = ABOUT_TITLE,
        paragraphs = paragraphs,
    )
}

/// Dataset charts page. Figures are drawn client-side by Plotly.js.
pub fn analytics_page(analytics: &Analytics) -> String {
    format!(
        r#"<div>
    <div id="boneage-graph" class="graph"></div>
    <div id="sex-graph" class="graph"></div>
    <script>
        (function () {{
            var boneage = {boneage};
            var sex = {sex};
            Plotly.newPlot('boneage-graph', boneage.data, boneage.layout, {{responsive: true}});
            Plotly.newPlot('sex-graph', sex.data, sex.layout, {{responsive: true}});
        }})();
    </script>
</div>"#,
        boneage = script_json(&analytics.boneage_chart().to_json()),
        sex = script_json(&analytics.sex_chart().to_json()),
    )
}

/// Image picker. Selected files are read as data URLs and posted to
/// `/api/upload`; the returned fragments replace the output area.
pub fn upload_page() -> String {
    r##"<div>
    <label id="upload-image" class="upload-zone">
        <input id="upload-input" type="file" accept="image/*" multiple hidden>
        <div>Drag and Drop or <a href="#" onclick="document.getElementById('upload-input').click(); return false;">Select Files</a></div>
    </label>
    <div id="output-image-upload"></div>
    <script>
        (function () {
            var zone = document.getElementById('upload-image');
            var input = document.getElementById('upload-input');
            var output = document.getElementById('output-image-upload');

            function readFile(file) {
                return new Promise(function (resolve, reject) {
                    var reader = new FileReader();
                    reader.onload = function () {
                        resolve({
                            contents: reader.result,
                            filename: file.name,
                            last_modified: file.lastModified / 1000
                        });
                    };
                    reader.onerror = function () { reject(reader.error); };
                    reader.readAsDataURL(file);
                });
            }

            function uploadError(response) {
                if (response.status === 413) {
                    return Promise.resolve('Las imágenes superan el tamaño máximo permitido');
                }
                return response.json()
                    .then(function (body) { return body.error.message; })
                    .catch(function () { return 'Error del servidor (HTTP ' + response.status + ')'; });
            }

            function upload(fileList) {
                var files = Array.prototype.slice.call(fileList);
                if (files.length === 0) { return; }
                output.innerHTML = '<p class="text-muted">Procesando...</p>';
                Promise.all(files.map(readFile))
                    .then(function (payload) {
                        return fetch('/api/upload', {
                            method: 'POST',
                            headers: {'Content-Type': 'application/json'},
                            body: JSON.stringify({files: payload})
                        });
                    })
                    .then(function (response) {
                        if (!response.ok) {
                            return uploadError(response).then(function (message) {
                                throw new Error(message);
                            });
                        }
                        return response.text();
                    })
                    .then(function (html) { output.innerHTML = html; })
                    .catch(function (err) {
                        output.innerHTML = '<div class="alert alert-danger"></div>';
                        output.firstChild.textContent = err.message || String(err);
                    });
            }

            input.addEventListener('change', function () { upload(input.files); input.value = ''; });
            zone.addEventListener('dragover', function (e) { e.preventDefault(); zone.classList.add('dragging'); });
            zone.addEventListener('dragleave', function () { zone.classList.remove('dragging'); });
            zone.addEventListener('drop', function (e) {
                e.preventDefault();
                zone.classList.remove('dragging');
                upload(e.dataTransfer.files);
            });
        })();
    </script>
</div>"##
        .to_string()
}

/// 404 message echoing the requested path
pub fn not_found_page(path: &str) -> String {
    format!(
        r#"<div class="jumbotron">
    <h1 class="text-danger">404: Not found</h1>
    <hr>
    <p>The pathname {path} was not recognised...</p>
</div>"#,
        path = html_escape(path),
    )
}
